//! Auth domain - phone input rules and the backend actions both flows share
//!
//! Responsibilities:
//! - Phone normalization, validation and display formatting
//! - OTP code sanitizing
//! - Mapping raw backend answers onto `AuthResult`

pub mod actions;
pub mod models;

pub use actions::{
    send_code, verify_code, INVALID_CODE, INVALID_PHONE, SEND_FAILED, VERIFY_FAILED,
};
pub use models::{format_phone, is_valid_phone, mask_phone, normalize_phone, OtpPolicy, PhonePolicy};
