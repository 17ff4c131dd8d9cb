pub mod code;
pub mod phone;

pub use code::{sanitize_code, OtpPolicy};
pub use phone::{format_phone, is_valid_phone, mask_phone, normalize_phone, PhonePolicy};
