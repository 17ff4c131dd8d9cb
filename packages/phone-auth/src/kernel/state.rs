//! Observable state holder.
//!
//! # Guarantees
//!
//! - **Replay-last**: a new subscriber sees the current snapshot immediately
//! - **Atomic mutations**: each `update` runs under the channel's write lock,
//!   so concurrent mutations never interleave partially
//! - **Conflation**: slow observers may skip intermediate snapshots but always
//!   end on the latest one
//!
//! State is never replaced from outside the owning flow: observers only get a
//! [`watch::Receiver`].

use std::fmt;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub struct StateHolder<S> {
    sender: watch::Sender<S>,
}

impl<S> StateHolder<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(initial: S) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> S {
        self.sender.borrow().clone()
    }

    /// Read a projection of the current state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Subscribe to snapshots. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.sender.subscribe()
    }

    /// Subscribe as a stream that yields the current value first.
    pub fn subscribe_stream(&self) -> WatchStream<S> {
        WatchStream::new(self.sender.subscribe())
    }

    /// Mutate and publish.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.sender.send_modify(f);
    }

    /// Mutate, publishing only when `f` returns `true`.
    ///
    /// Check-and-set guards (e.g. "not already loading") belong in `f` so the
    /// check and the write happen under one lock.
    pub fn update_if(&self, f: impl FnOnce(&mut S) -> bool) -> bool {
        self.sender.send_if_modified(f)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<S: fmt::Debug> fmt::Debug for StateHolder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHolder")
            .field("state", &*self.sender.borrow())
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}
