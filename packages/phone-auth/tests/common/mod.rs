//! Shared harness for flow integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use phone_auth::kernel::MockAuthBackend;
use phone_auth::{AuthDeps, Config};

/// Country-prefixed phone the OTP screen is seeded with.
pub const PHONE: &str = "+992901234567";

pub struct TestHarness {
    pub backend: MockAuthBackend,
    pub deps: AuthDeps,
}

impl TestHarness {
    /// Default config (9 digits, +992, 6-digit codes, 60s resend) over an
    /// accept-everything mock.
    pub fn new() -> Self {
        Self::with_backend(MockAuthBackend::new())
    }

    pub fn with_backend(backend: MockAuthBackend) -> Self {
        let deps = AuthDeps::new(Arc::new(backend.clone()), &Config::default());
        Self { backend, deps }
    }
}

/// Let the paused clock run for `millis`.
pub async fn elapse(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
