use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::domains::auth::{OtpPolicy, PhonePolicy};

pub const DEFAULT_PHONE_MIN_LENGTH: usize = 9;
pub const DEFAULT_COUNTRY_CODE: &str = "+992";
pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const DEFAULT_RESEND_INTERVAL_SECS: u32 = 60;
pub const DEFAULT_FAKE_LATENCY_MS: u64 = 800;
pub const DEFAULT_FAKE_ACCEPTED_CODE: &str = "123456";

/// Login configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub phone_min_length: usize,
    pub phone_country_code: String,
    pub otp_code_length: usize,
    pub otp_resend_interval_secs: u32,
    pub fake_backend_latency_ms: u64,
    pub fake_backend_accepted_code: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            phone_min_length: parse_var("PHONE_MIN_LENGTH", DEFAULT_PHONE_MIN_LENGTH)?,
            phone_country_code: env::var("PHONE_COUNTRY_CODE")
                .unwrap_or_else(|_| DEFAULT_COUNTRY_CODE.to_string()),
            otp_code_length: parse_var("OTP_CODE_LENGTH", DEFAULT_CODE_LENGTH)?,
            otp_resend_interval_secs: parse_var(
                "OTP_RESEND_INTERVAL_SECS",
                DEFAULT_RESEND_INTERVAL_SECS,
            )?,
            fake_backend_latency_ms: parse_var("FAKE_BACKEND_LATENCY_MS", DEFAULT_FAKE_LATENCY_MS)?,
            fake_backend_accepted_code: env::var("FAKE_BACKEND_ACCEPTED_CODE")
                .unwrap_or_else(|_| DEFAULT_FAKE_ACCEPTED_CODE.to_string()),
        })
    }

    pub fn phone_policy(&self) -> PhonePolicy {
        PhonePolicy {
            min_length: self.phone_min_length,
            country_code: self.phone_country_code.clone(),
        }
    }

    pub fn otp_policy(&self) -> OtpPolicy {
        OtpPolicy {
            code_length: self.otp_code_length,
            resend_interval: self.otp_resend_interval_secs,
            tick: Duration::from_secs(1),
        }
    }

    pub fn fake_backend_latency(&self) -> Duration {
        Duration::from_millis(self.fake_backend_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            phone_min_length: DEFAULT_PHONE_MIN_LENGTH,
            phone_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            otp_code_length: DEFAULT_CODE_LENGTH,
            otp_resend_interval_secs: DEFAULT_RESEND_INTERVAL_SECS,
            fake_backend_latency_ms: DEFAULT_FAKE_LATENCY_MS,
            fake_backend_accepted_code: DEFAULT_FAKE_ACCEPTED_CODE.to_string(),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
