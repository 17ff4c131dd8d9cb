use serde::Serialize;

use crate::domains::auth::format_phone;

/// Snapshot of the phone entry screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeSendState {
    /// Normalized digits, without country code.
    pub phone: String,
    pub is_valid: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl CodeSendState {
    /// `phone` grouped for display.
    pub fn display_phone(&self) -> String {
        format_phone(&self.phone)
    }

    pub fn can_send(&self) -> bool {
        self.is_valid && !self.is_loading
    }
}
