//! CodeSendFlow - phone entry and code dispatch.
//!
//! # Guarantees
//!
//! - **At most one send in flight**: `send_code` while loading returns without
//!   touching the backend
//! - **No local-invalid sends**: a phone below the minimum length never
//!   reaches the backend
//! - **Nothing after close**: once closed, in-flight results are discarded and
//!   no state is mutated

use std::sync::Arc;

use futures::Stream;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use super::{CodeSendState, LoginEvent};
use crate::domains::auth::{self, mask_phone, normalize_phone, PhonePolicy};
use crate::kernel::{BaseAuthBackend, EventChannel, StateHolder};

pub const INVALID_PHONE_INPUT: &str = "Enter a valid phone number";

/// Handle to a login flow. Clones share the same flow.
#[derive(Clone)]
pub struct CodeSendFlow {
    inner: Arc<Inner>,
}

struct Inner {
    id: Uuid,
    backend: Arc<dyn BaseAuthBackend>,
    policy: PhonePolicy,
    state: StateHolder<CodeSendState>,
    events: EventChannel<LoginEvent>,
    cancel: CancellationToken,
}

impl Inner {
    /// Mutate unless the flow is closed. The closed check and the write share
    /// the state lock, so `close` cannot slip in between.
    fn mutate(&self, f: impl FnOnce(&mut CodeSendState) -> bool) -> bool {
        let cancel = &self.cancel;
        self.state.update_if(|s| !cancel.is_cancelled() && f(s))
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl CodeSendFlow {
    pub fn new(backend: Arc<dyn BaseAuthBackend>, policy: PhonePolicy) -> Self {
        let id = Uuid::new_v4();
        debug!(flow_id = %id, min_length = policy.min_length, "login flow created");

        Self {
            inner: Arc::new(Inner {
                id,
                backend,
                policy,
                state: StateHolder::new(CodeSendState::default()),
                events: EventChannel::new(),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn policy(&self) -> &PhonePolicy {
        &self.inner.policy
    }

    pub fn state(&self) -> CodeSendState {
        self.inner.state.snapshot()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<CodeSendState> {
        self.inner.state.subscribe()
    }

    pub fn state_stream(&self) -> WatchStream<CodeSendState> {
        self.inner.state.subscribe_stream()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<LoginEvent> {
        self.inner.events.subscribe()
    }

    pub fn event_stream(&self) -> impl Stream<Item = LoginEvent> + Send + 'static {
        self.inner.events.subscribe_stream()
    }

    /// Normalize `raw`, revalidate, and clear any error. No backend call.
    pub fn on_phone_changed(&self, raw: &str) {
        let digits = normalize_phone(raw);
        let is_valid = self.inner.policy.is_valid(&digits);

        self.inner.mutate(|s| {
            s.phone = digits;
            s.is_valid = is_valid;
            s.error = None;
            true
        });
    }

    /// Ask the backend to send a code to the current phone.
    ///
    /// Ignored while a send is in flight. An invalid phone only sets `error`.
    /// On success emits [`LoginEvent::CodeSent`] with the country-prefixed
    /// number; on failure sets `error` and emits [`LoginEvent::Error`].
    pub async fn send_code(&self) {
        let inner = &self.inner;
        let policy = &inner.policy;

        let mut digits = None;
        inner.mutate(|s| {
            if s.is_loading {
                return false;
            }
            if !policy.is_valid(&s.phone) {
                s.error = Some(INVALID_PHONE_INPUT.to_string());
                return true;
            }
            s.is_loading = true;
            s.error = None;
            digits = Some(s.phone.clone());
            true
        });

        let Some(digits) = digits else {
            debug!(flow_id = %inner.id, "send_code skipped");
            return;
        };

        let phone = policy.with_country_code(&digits);
        debug!(flow_id = %inner.id, phone = %mask_phone(&phone), "sending code");

        let outcome = tokio::select! {
            biased;
            _ = inner.cancel.cancelled() => {
                debug!(flow_id = %inner.id, "login flow closed while sending");
                return;
            }
            outcome = auth::send_code(&phone, inner.backend.as_ref()) => outcome,
        };

        match outcome {
            Ok(()) => {
                if inner.mutate(|s| {
                    s.is_loading = false;
                    true
                }) {
                    info!(flow_id = %inner.id, phone = %mask_phone(&phone), "code dispatched");
                    inner.events.emit(LoginEvent::CodeSent { phone });
                }
            }
            Err(e) => {
                let message = e.message().to_string();
                if inner.mutate(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                    true
                }) {
                    inner.events.emit(LoginEvent::Error { message });
                }
            }
        }
    }

    /// Tear the flow down. In-flight sends resolve without effect.
    pub fn close(&self) {
        let cancel = &self.inner.cancel;
        self.inner.state.update_if(|_| {
            cancel.cancel();
            false
        });
        debug!(flow_id = %self.inner.id, "login flow closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

impl std::fmt::Debug for CodeSendFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeSendFlow")
            .field("id", &self.inner.id)
            .field("state", &self.inner.state.snapshot())
            .field("closed", &self.inner.cancel.is_cancelled())
            .finish()
    }
}
