use serde::Serialize;

/// One-shot events of the code entry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OtpEvent {
    /// The code was accepted. Terminal: the caller tears the flow down.
    Verified,

    /// A fresh code went out and the countdown restarted.
    CodeResent,
}
