//! Phone number + one-time-passcode (OTP) login.
//!
//! Two flows drive the login:
//! - [`CodeSendFlow`](domains::login::CodeSendFlow) normalizes the phone
//!   number and asks the backend to dispatch a code
//! - [`OtpEntryFlow`](domains::otp::OtpEntryFlow) collects the code, verifies
//!   it, and gates resends behind a countdown
//!
//! Each flow exposes an observable state snapshot and a separate stream of
//! one-shot events. The backend is injected through
//! [`BaseAuthBackend`](kernel::BaseAuthBackend).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use common::{AuthError, AuthResult};
pub use config::Config;
pub use domains::auth::{OtpPolicy, PhonePolicy};
pub use domains::login::{CodeSendFlow, CodeSendState, LoginEvent};
pub use domains::otp::{OtpEntryFlow, OtpEvent, OtpState};
pub use kernel::{AuthDeps, BaseAuthBackend, FakeAuthBackend};
