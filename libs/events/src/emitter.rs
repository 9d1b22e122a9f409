//! Fire-and-forget fan-out of progress events.

use tokio::sync::broadcast;
use tracing::debug;

use crate::types::{ProgressEvent, JOB_PROGRESS};

/// Receiving half handed to subscribers (dashboards, bots, tests).
pub type ProgressReceiver = broadcast::Receiver<ProgressEvent>;

/// Process-wide publish capability for progress events.
///
/// Fan-out is synchronous; subscribers run on their own tasks, so a
/// misbehaving subscriber cannot reach back into the publisher. Slow
/// subscribers lose old events once the channel capacity is exceeded.
#[derive(Debug, Clone)]
pub struct ProgressEmitter {
    tx: broadcast::Sender<ProgressEvent>,
}

impl ProgressEmitter {
    /// Create an emitter with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> ProgressReceiver {
        self.tx.subscribe()
    }

    /// Publish an event to all current subscribers.
    ///
    /// Having zero subscribers is not an error; the event is dropped.
    pub fn emit(&self, event: ProgressEvent) {
        match self.tx.send(event) {
            Ok(delivered) => debug!(event = JOB_PROGRESS, delivered, "Progress event published"),
            Err(_) => debug!(event = JOB_PROGRESS, "Progress event dropped, no subscribers"),
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ProgressEmitter {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_subscriber() {
        let emitter = ProgressEmitter::new(8);
        let mut rx = emitter.subscribe();

        emitter.emit(ProgressEvent::now("nominator-round", 50, "1/2 nominator groups"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.progress, 50);
        assert_eq!(event.name, "nominator-round");
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_silent() {
        let emitter = ProgressEmitter::new(8);
        assert_eq!(emitter.subscriber_count(), 0);

        // Must not panic or error.
        emitter.emit(ProgressEvent::now("nominator-round", 100, "1/1 nominator groups"));
    }

    #[tokio::test]
    async fn test_fan_out_to_multiple_subscribers() {
        let emitter = ProgressEmitter::new(8);
        let mut rx1 = emitter.subscribe();
        let mut rx2 = emitter.subscribe();

        emitter.emit(ProgressEvent::now("nominator-round", 100, "1/1 nominator groups"));

        assert_eq!(rx1.recv().await.unwrap().progress, 100);
        assert_eq!(rx2.recv().await.unwrap().progress, 100);
    }
}
