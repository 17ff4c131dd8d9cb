//! Send code action

use tracing::{error, info, warn};

use super::guard_backend_call;
use crate::common::{AuthError, AuthResult};
use crate::domains::auth::mask_phone;
use crate::kernel::BaseAuthBackend;

pub const INVALID_PHONE: &str = "Invalid phone number";
pub const SEND_FAILED: &str = "Could not send code";

/// Ask the backend to dispatch a code to `phone`.
///
/// Returns `Rejected` when the backend refuses the number and `Transport`
/// when the call fails.
pub async fn send_code(phone: &str, backend: &dyn BaseAuthBackend) -> AuthResult<()> {
    match guard_backend_call(backend.send_code(phone)).await {
        Ok(true) => {
            info!(phone = %mask_phone(phone), "code sent");
            Ok(())
        }
        Ok(false) => {
            warn!(phone = %mask_phone(phone), "backend refused phone number");
            Err(AuthError::rejected(INVALID_PHONE))
        }
        Err(e) => {
            error!(phone = %mask_phone(phone), error = %e, "failed to send code");
            Err(AuthError::transport(SEND_FAILED, e))
        }
    }
}
