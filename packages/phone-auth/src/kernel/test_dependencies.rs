// TestDependencies - mock implementations for testing
//
// Provides a scripted backend that can be injected into flows for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::BaseAuthBackend;

// =============================================================================
// Mock Auth Backend
// =============================================================================

/// How the mock answers one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Accept,
    Reject,
    /// The call fails with this message (transport error).
    Fail(String),
    /// The call panics with this message.
    Panic(String),
}

/// A call the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    SendCode { phone: String },
    VerifyCode { phone: String, code: String },
}

#[derive(Clone, Default)]
pub struct MockAuthBackend {
    send_replies: Arc<Mutex<VecDeque<MockReply>>>,
    verify_replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<BackendCall>>>,
    latency: Option<Duration>,
}

impl MockAuthBackend {
    /// A backend that accepts everything once the scripted replies run out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call (use with a paused tokio clock).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a reply for the next `send_code` call
    pub fn with_send_reply(self, reply: MockReply) -> Self {
        self.send_replies.lock().unwrap().push_back(reply);
        self
    }

    /// Queue a reply for the next `verify_code` call
    pub fn with_verify_reply(self, reply: MockReply) -> Self {
        self.verify_replies.lock().unwrap().push_back(reply);
        self
    }

    /// Get all calls in the order they arrived
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn send_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::SendCode { .. }))
            .count()
    }

    pub fn verify_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::VerifyCode { .. }))
            .count()
    }

    async fn answer(&self, replies: &Mutex<VecDeque<MockReply>>) -> Result<bool> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let reply = replies.lock().unwrap().pop_front().unwrap_or(MockReply::Accept);
        match reply {
            MockReply::Accept => Ok(true),
            MockReply::Reject => Ok(false),
            MockReply::Fail(message) => Err(anyhow::anyhow!(message)),
            MockReply::Panic(message) => panic!("{}", message),
        }
    }
}

#[async_trait]
impl BaseAuthBackend for MockAuthBackend {
    async fn send_code(&self, phone: &str) -> Result<bool> {
        self.calls.lock().unwrap().push(BackendCall::SendCode {
            phone: phone.to_string(),
        });
        self.answer(&self.send_replies).await
    }

    async fn verify_code(&self, phone: &str, code: &str) -> Result<bool> {
        self.calls.lock().unwrap().push(BackendCall::VerifyCode {
            phone: phone.to_string(),
            code: code.to_string(),
        });
        self.answer(&self.verify_replies).await
    }
}
