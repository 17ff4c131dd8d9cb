//! One-shot event channel for flow notifications.
//!
//! # Guarantees
//!
//! - **Once per subscriber**: every receiver attached at emission time gets
//!   the event exactly once
//! - **No replay**: receivers attached after emission never see it
//! - **In-memory only**: events emitted with no receivers are dropped
//!
//! Durable facts (loading flags, errors) live in the flow's state snapshot,
//! not here. The two are never merged.

use std::fmt;

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

/// Default channel capacity. Flows emit a handful of events per screen.
const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct EventChannel<E> {
    sender: broadcast::Sender<E>,
}

impl<E> EventChannel<E>
where
    E: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to the attached subscribers.
    ///
    /// Returns the number of receivers that received the event.
    pub fn emit(&self, event: E) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    /// Subscribe as a stream. Lagged gaps are logged and skipped.
    pub fn subscribe_stream(&self) -> impl Stream<Item = E> + Send + 'static {
        BroadcastStream::new(self.sender.subscribe()).filter_map(|item| async move {
            match item {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "event subscriber lagged");
                    None
                }
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E> Default for EventChannel<E>
where
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Ping(u32),
    }

    #[tokio::test]
    async fn test_emit_and_receive_once() {
        let channel = EventChannel::new();
        let mut receiver = channel.subscribe();

        assert_eq!(channel.emit(TestEvent::Ping(1)), 1);

        assert_eq!(receiver.recv().await.unwrap(), TestEvent::Ping(1));
        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_no_replay_to_late_subscribers() {
        let channel = EventChannel::new();
        assert_eq!(channel.emit(TestEvent::Ping(1)), 0);

        let mut late = channel.subscribe();

        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_every_attached_subscriber_gets_the_event() {
        let channel = EventChannel::new();
        let mut first = channel.subscribe();
        let mut second = channel.subscribe();

        assert_eq!(channel.emit(TestEvent::Ping(9)), 2);

        assert_eq!(first.recv().await.unwrap(), TestEvent::Ping(9));
        assert_eq!(second.recv().await.unwrap(), TestEvent::Ping(9));
    }

    #[tokio::test]
    async fn test_stream_skips_lagged_gap() {
        let channel = EventChannel::with_capacity(2);
        let stream = channel.subscribe_stream();
        tokio::pin!(stream);

        for i in 0..4 {
            channel.emit(TestEvent::Ping(i));
        }

        // Capacity 2 keeps the newest two; the lag error itself is swallowed.
        assert_eq!(stream.next().await.unwrap(), TestEvent::Ping(2));
        assert_eq!(stream.next().await.unwrap(), TestEvent::Ping(3));
    }
}
