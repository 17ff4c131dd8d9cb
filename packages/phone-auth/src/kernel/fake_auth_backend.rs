// FakeAuthBackend - in-process backend for demos and local development
//
// Simulates network latency and accepts a single known code.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::BaseAuthBackend;
use crate::config::Config;
use crate::domains::auth::{mask_phone, normalize_phone};

#[derive(Debug, Clone)]
pub struct FakeAuthBackend {
    latency: Duration,
    min_phone_digits: usize,
    accepted_code: String,
}

impl FakeAuthBackend {
    pub fn new(latency: Duration, min_phone_digits: usize, accepted_code: impl Into<String>) -> Self {
        Self {
            latency,
            min_phone_digits,
            accepted_code: accepted_code.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.fake_backend_latency(),
            config.phone_min_length,
            config.fake_backend_accepted_code.clone(),
        )
    }
}

#[async_trait]
impl BaseAuthBackend for FakeAuthBackend {
    async fn send_code(&self, phone: &str) -> Result<bool> {
        tokio::time::sleep(self.latency).await;
        let accepted = normalize_phone(phone).len() >= self.min_phone_digits;
        debug!(phone = %mask_phone(phone), accepted, "fake backend send_code");
        Ok(accepted)
    }

    async fn verify_code(&self, phone: &str, code: &str) -> Result<bool> {
        tokio::time::sleep(self.latency).await;
        let accepted = code == self.accepted_code;
        debug!(phone = %mask_phone(phone), accepted, "fake backend verify_code");
        Ok(accepted)
    }
}
