//! Auth domain actions - backend calls shared by both flows
//!
//! Actions turn the backend's `Result<bool>` into an `AuthResult`:
//! `Ok(false)` becomes a rejection, `Err` (or a panic) a transport failure.

mod send_code;
mod verify_code;

pub use send_code::{send_code, INVALID_PHONE, SEND_FAILED};
pub use verify_code::{verify_code, INVALID_CODE, VERIFY_FAILED};

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

/// Await a backend call, turning a panic inside it into an error.
pub(crate) async fn guard_backend_call<F>(call: F) -> anyhow::Result<bool>
where
    F: Future<Output = anyhow::Result<bool>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(panic_info) => Err(anyhow::anyhow!(
            "backend panicked: {}",
            panic_message(panic_info.as_ref())
        )),
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
