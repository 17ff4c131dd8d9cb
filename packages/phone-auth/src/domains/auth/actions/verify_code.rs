//! Verify code action

use tracing::{error, info, warn};

use super::guard_backend_call;
use crate::common::{AuthError, AuthResult};
use crate::domains::auth::mask_phone;
use crate::kernel::BaseAuthBackend;

pub const INVALID_CODE: &str = "Invalid code";
pub const VERIFY_FAILED: &str = "Could not verify code";

/// Check `code` for `phone` with the backend.
pub async fn verify_code(phone: &str, code: &str, backend: &dyn BaseAuthBackend) -> AuthResult<()> {
    match guard_backend_call(backend.verify_code(phone, code)).await {
        Ok(true) => {
            info!(phone = %mask_phone(phone), "code verified");
            Ok(())
        }
        Ok(false) => {
            warn!(phone = %mask_phone(phone), "backend rejected code");
            Err(AuthError::rejected(INVALID_CODE))
        }
        Err(e) => {
            error!(phone = %mask_phone(phone), error = %e, "failed to verify code");
            Err(AuthError::transport(VERIFY_FAILED, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MockAuthBackend, MockReply};

    #[tokio::test]
    async fn test_verify_code_outcomes() {
        let backend = MockAuthBackend::new()
            .with_verify_reply(MockReply::Accept)
            .with_verify_reply(MockReply::Reject)
            .with_verify_reply(MockReply::Fail("timeout".to_string()));

        assert!(verify_code("+992901234567", "123456", &backend).await.is_ok());

        let rejected = verify_code("+992901234567", "000000", &backend).await.unwrap_err();
        assert_eq!(rejected.message(), INVALID_CODE);
        assert!(!rejected.is_transport());

        let failed = verify_code("+992901234567", "123456", &backend).await.unwrap_err();
        assert_eq!(failed.message(), VERIFY_FAILED);
        assert!(failed.is_transport());

        assert_eq!(backend.verify_calls(), 3);
    }
}
