//! OTP domain - code entry, verification and the resend countdown
//!
//! Architecture:
//!   input → OtpEntryFlow (state snapshot) → verify_code / send_code actions → OtpEvent
//!                 ↑
//!           Countdown ticks (remaining_seconds, is_resend_available)

pub mod events;
pub mod flow;
pub mod state;

pub use events::OtpEvent;
pub use flow::OtpEntryFlow;
pub use state::OtpState;
