// AuthDeps - constructor-injection container for the login flows
//
// Holds the backend and the policies read from config. Flows get their
// dependencies from here as constructor arguments; nothing is global.

use std::sync::Arc;

use super::{BaseAuthBackend, FakeAuthBackend};
use crate::config::Config;
use crate::domains::auth::{OtpPolicy, PhonePolicy};
use crate::domains::login::CodeSendFlow;
use crate::domains::otp::OtpEntryFlow;

#[derive(Clone)]
pub struct AuthDeps {
    pub backend: Arc<dyn BaseAuthBackend>,
    pub phone_policy: PhonePolicy,
    pub otp_policy: OtpPolicy,
}

impl AuthDeps {
    pub fn new(backend: Arc<dyn BaseAuthBackend>, config: &Config) -> Self {
        Self {
            backend,
            phone_policy: config.phone_policy(),
            otp_policy: config.otp_policy(),
        }
    }

    /// Dependencies backed by [`FakeAuthBackend`].
    pub fn fake(config: &Config) -> Self {
        Self::new(Arc::new(FakeAuthBackend::from_config(config)), config)
    }

    /// Flow for the phone entry screen.
    pub fn login_flow(&self) -> CodeSendFlow {
        CodeSendFlow::new(self.backend.clone(), self.phone_policy.clone())
    }

    /// Flow for the code entry screen; starts the resend countdown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn otp_flow(&self, phone: impl Into<String>) -> OtpEntryFlow {
        OtpEntryFlow::start(phone, self.backend.clone(), self.otp_policy.clone())
    }
}

impl std::fmt::Debug for AuthDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthDeps")
            .field("phone_policy", &self.phone_policy)
            .field("otp_policy", &self.otp_policy)
            .finish_non_exhaustive()
    }
}
