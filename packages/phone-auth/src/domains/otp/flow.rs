//! OtpEntryFlow - code entry, verification and the resend countdown.
//!
//! # Guarantees
//!
//! - **One call in flight**: verify and resend exclude each other and themselves
//! - **One countdown**: starting a countdown cancels the previous one first;
//!   ticks from a superseded countdown are discarded
//! - **Verification is final**: after [`OtpEvent::Verified`] the countdown is
//!   stopped, `remaining_seconds` stays at 0 and further input is ignored
//! - **Nothing after close**: closing cancels the countdown and discards
//!   in-flight results

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures::Stream;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use super::{OtpEvent, OtpState};
use crate::domains::auth::{self, mask_phone, models::sanitize_code, OtpPolicy};
use crate::kernel::{BaseAuthBackend, Countdown, EventChannel, StateHolder};

/// Handle to a code entry flow. Clones share the same flow.
#[derive(Clone)]
pub struct OtpEntryFlow {
    inner: Arc<Inner>,
}

struct Inner {
    id: Uuid,
    phone: String,
    backend: Arc<dyn BaseAuthBackend>,
    policy: OtpPolicy,
    state: StateHolder<OtpState>,
    events: EventChannel<OtpEvent>,
    cancel: CancellationToken,
    countdown: Mutex<Option<Countdown>>,
    /// Bumped whenever a countdown is started or stopped.
    countdown_epoch: AtomicU64,
}

impl Inner {
    /// Mutate unless the flow is closed (checked under the state lock).
    fn mutate(&self, f: impl FnOnce(&mut OtpState) -> bool) -> bool {
        let cancel = &self.cancel;
        self.state.update_if(|s| !cancel.is_cancelled() && f(s))
    }

    fn incomplete_code_error(&self) -> String {
        format!("Enter the {}-digit code", self.policy.code_length)
    }

    /// Cancel any running countdown and start a fresh one at the full interval.
    fn restart_countdown(self: &Arc<Self>) {
        let mut slot = self.countdown.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        let epoch = self.countdown_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let interval = self.policy.resend_interval;
        let reset = self.mutate(|s| {
            if s.is_verified {
                return false;
            }
            s.remaining_seconds = interval;
            s.is_resend_available = interval == 0;
            s.is_resend_loading = false;
            true
        });
        if !reset || interval == 0 {
            return;
        }

        debug!(flow_id = %self.id, interval, epoch, "resend countdown started");
        let weak = Arc::downgrade(self);
        *slot = Some(Countdown::start(
            interval,
            self.policy.tick,
            &self.cancel,
            move |remaining| Inner::on_tick(&weak, epoch, remaining),
        ));
    }

    /// Apply one tick. Returns `false` once the tick belongs to a superseded
    /// countdown or the flow is gone, which ends the countdown task.
    fn on_tick(weak: &Weak<Inner>, epoch: u64, remaining: u32) -> bool {
        let Some(inner) = weak.upgrade() else {
            return false;
        };
        let current = &inner.countdown_epoch;
        inner.mutate(|s| {
            if current.load(Ordering::SeqCst) != epoch || s.is_verified {
                return false;
            }
            s.apply_tick(remaining);
            true
        })
    }

    fn stop_countdown(&self) {
        let mut slot = self.countdown.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(countdown) = slot.take() {
            countdown.cancel();
        }
        self.countdown_epoch.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl OtpEntryFlow {
    /// Create the flow for `phone` and start the resend countdown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        phone: impl Into<String>,
        backend: Arc<dyn BaseAuthBackend>,
        policy: OtpPolicy,
    ) -> Self {
        let phone = phone.into();
        let id = Uuid::new_v4();
        info!(flow_id = %id, phone = %mask_phone(&phone), "otp flow started");

        let inner = Arc::new(Inner {
            id,
            phone,
            backend,
            state: StateHolder::new(OtpState::new(policy.resend_interval)),
            policy,
            events: EventChannel::new(),
            cancel: CancellationToken::new(),
            countdown: Mutex::new(None),
            countdown_epoch: AtomicU64::new(0),
        });
        inner.restart_countdown();

        Self { inner }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// The phone the code was sent to.
    pub fn phone(&self) -> &str {
        &self.inner.phone
    }

    pub fn policy(&self) -> &OtpPolicy {
        &self.inner.policy
    }

    pub fn state(&self) -> OtpState {
        self.inner.state.snapshot()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<OtpState> {
        self.inner.state.subscribe()
    }

    pub fn state_stream(&self) -> WatchStream<OtpState> {
        self.inner.state.subscribe_stream()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<OtpEvent> {
        self.inner.events.subscribe()
    }

    pub fn event_stream(&self) -> impl Stream<Item = OtpEvent> + Send + 'static {
        self.inner.events.subscribe_stream()
    }

    /// Replace the whole code. Non-digits are dropped and the code is cut at
    /// `code_length`; assembling per-digit boxes is the caller's job.
    pub fn on_code_changed(&self, code: &str) {
        let code = sanitize_code(code, self.inner.policy.code_length);
        let is_complete = code.len() == self.inner.policy.code_length;

        self.inner.mutate(|s| {
            if s.is_verified {
                return false;
            }
            s.code = code;
            s.is_complete = is_complete;
            s.error = None;
            true
        });
    }

    /// Verify the current code.
    ///
    /// Ignored while a call is in flight or after verification. An incomplete
    /// code only sets `error`. On success stops the countdown and emits
    /// [`OtpEvent::Verified`]; on failure sets `error` and leaves the
    /// countdown running.
    pub async fn submit(&self) {
        let inner = &self.inner;
        let incomplete = inner.incomplete_code_error();

        let mut code = None;
        inner.mutate(|s| {
            if s.is_verified || s.is_busy() {
                return false;
            }
            if !s.is_complete {
                s.error = Some(incomplete);
                return true;
            }
            s.is_loading = true;
            s.error = None;
            code = Some(s.code.clone());
            true
        });

        let Some(code) = code else {
            debug!(flow_id = %inner.id, "submit skipped");
            return;
        };

        let outcome = tokio::select! {
            biased;
            _ = inner.cancel.cancelled() => {
                debug!(flow_id = %inner.id, "otp flow closed while verifying");
                return;
            }
            outcome = auth::verify_code(&inner.phone, &code, inner.backend.as_ref()) => outcome,
        };
        if inner.cancel.is_cancelled() {
            return;
        }

        match outcome {
            Ok(()) => {
                inner.stop_countdown();
                let verified = inner.mutate(|s| {
                    s.is_loading = false;
                    s.is_verified = true;
                    s.remaining_seconds = 0;
                    s.is_resend_available = false;
                    true
                });
                if verified {
                    info!(flow_id = %inner.id, "otp verified");
                    inner.events.emit(OtpEvent::Verified);
                }
            }
            Err(e) => {
                inner.mutate(|s| {
                    s.is_loading = false;
                    s.error = Some(e.message().to_string());
                    true
                });
            }
        }
    }

    /// Ask the backend for a fresh code.
    ///
    /// Only once the countdown reached zero and no call is in flight. On
    /// success clears the code, restarts the countdown and emits
    /// [`OtpEvent::CodeResent`]. On failure sets `error` and keeps resend
    /// available so the user can retry right away.
    pub async fn resend_code(&self) {
        let inner = &self.inner;

        let started = inner.mutate(|s| {
            if s.is_verified || !s.is_resend_available || s.is_busy() {
                return false;
            }
            s.is_resend_loading = true;
            s.error = None;
            true
        });
        if !started {
            debug!(flow_id = %inner.id, "resend skipped");
            return;
        }

        let outcome = tokio::select! {
            biased;
            _ = inner.cancel.cancelled() => {
                debug!(flow_id = %inner.id, "otp flow closed while resending");
                return;
            }
            outcome = auth::send_code(&inner.phone, inner.backend.as_ref()) => outcome,
        };
        if inner.cancel.is_cancelled() {
            return;
        }

        match outcome {
            Ok(()) => {
                inner.mutate(|s| {
                    s.code.clear();
                    s.is_complete = false;
                    s.is_resend_loading = false;
                    true
                });
                inner.restart_countdown();
                if !inner.cancel.is_cancelled() {
                    info!(flow_id = %inner.id, "code resent");
                    inner.events.emit(OtpEvent::CodeResent);
                }
            }
            Err(e) => {
                inner.mutate(|s| {
                    s.is_resend_loading = false;
                    s.is_resend_available = true;
                    s.error = Some(e.message().to_string());
                    true
                });
            }
        }
    }

    /// Tear the flow down: stop the countdown and discard in-flight results.
    pub fn close(&self) {
        let cancel = &self.inner.cancel;
        self.inner.state.update_if(|_| {
            cancel.cancel();
            false
        });
        self.inner.stop_countdown();
        debug!(flow_id = %self.inner.id, "otp flow closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Whether a countdown task is still ticking.
    pub fn is_counting_down(&self) -> bool {
        self.inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|c| !c.is_finished())
    }
}

impl std::fmt::Debug for OtpEntryFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpEntryFlow")
            .field("id", &self.inner.id)
            .field("phone", &mask_phone(&self.inner.phone))
            .field("state", &self.inner.state.snapshot())
            .field("closed", &self.inner.cancel.is_cancelled())
            .finish()
    }
}
