use serde::Serialize;

/// Snapshot of the code entry screen.
///
/// Invariants kept by the flow:
/// - `is_complete == (code.len() == code_length)`
/// - `is_resend_available == (remaining_seconds == 0)` while not verified
/// - `is_loading` and `is_resend_loading` are never both true
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OtpState {
    pub code: String,
    pub is_complete: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub remaining_seconds: u32,
    pub is_resend_available: bool,
    pub is_resend_loading: bool,
    pub is_verified: bool,
}

impl OtpState {
    pub(crate) fn new(resend_interval: u32) -> Self {
        Self {
            remaining_seconds: resend_interval,
            is_resend_available: resend_interval == 0,
            ..Self::default()
        }
    }

    pub fn can_submit(&self) -> bool {
        self.is_complete && !self.is_busy() && !self.is_verified
    }

    pub fn can_resend(&self) -> bool {
        self.is_resend_available && !self.is_busy() && !self.is_verified
    }

    /// A verify or resend call is in flight.
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_resend_loading
    }

    /// Countdown formatted as `m:ss`.
    pub fn countdown_label(&self) -> String {
        format!("{}:{:02}", self.remaining_seconds / 60, self.remaining_seconds % 60)
    }

    pub(crate) fn apply_tick(&mut self, remaining: u32) {
        self.remaining_seconds = remaining;
        self.is_resend_available = remaining == 0;
    }
}
