use serde::Serialize;

/// One-shot login events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoginEvent {
    /// A code went out; move on to code entry for this (country-prefixed) phone.
    CodeSent { phone: String },

    /// Sending failed; show a transient message.
    Error { message: String },
}
