//! Login domain - phone entry and code dispatch
//!
//! Architecture:
//!   input → CodeSendFlow (state snapshot) → send_code action → LoginEvent
//!
//! The flow owns its state; observers read snapshots and consume events.

pub mod events;
pub mod flow;
pub mod state;

pub use events::LoginEvent;
pub use flow::{CodeSendFlow, INVALID_PHONE_INPUT};
pub use state::CodeSendState;
