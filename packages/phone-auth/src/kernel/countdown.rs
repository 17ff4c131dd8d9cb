//! Cancellable countdown task.
//!
//! A countdown ticks once per `period` from `total` down to zero and reports
//! the remaining count after every tick. The [`Countdown`] handle owns the
//! task: cancelling or dropping it stops the task before its next tick.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub struct Countdown {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn a countdown on the current tokio runtime.
    ///
    /// `on_tick` receives the remaining count (`total - 1` down to `0`).
    /// Returning `false` ends the countdown early. Cancelling `parent`
    /// cancels the countdown too.
    pub fn start<F>(total: u32, period: Duration, parent: &CancellationToken, mut on_tick: F) -> Self
    where
        F: FnMut(u32) -> bool + Send + 'static,
    {
        let token = parent.child_token();
        let cancel = token.clone();

        let handle = tokio::spawn(async move {
            let mut remaining = total;
            while remaining > 0 {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(period) => {}
                }
                if cancel.is_cancelled() {
                    return;
                }

                remaining -= 1;
                trace!(remaining, "countdown tick");
                if !on_tick(remaining) {
                    return;
                }
            }
        });

        Self { token, handle }
    }

    /// Stop the countdown. No tick is delivered after this returns, unless one
    /// is already executing on another worker thread.
    pub fn cancel(&self) {
        self.token.cancel();
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the task has run to zero, stopped early, or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Countdown")
            .field("cancelled", &self.token.is_cancelled())
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
