use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::dto::sse::{Handshake, ServerEvent};

/// Live subscription to the event hub.
///
/// Dropping the receiver is not enough to deregister immediately; callers
/// deregister through [`EventHub::unsubscribe`] with the carried id, and
/// [`EventHub::publish`] prunes closed channels as a fallback.
pub struct Subscription {
    /// Handle used to deregister this subscriber.
    pub id: Uuid,
    /// Channel the hub pushes frames into.
    pub receiver: mpsc::UnboundedReceiver<ServerEvent>,
}

/// Fan-out point delivering every accepted mutation to all live viewers.
///
/// The registry is its own concurrent map, distinct from the document gate,
/// so a slow or dead subscriber can never stall a mutation.
pub struct EventHub {
    subscribers: DashMap<Uuid, mpsc::UnboundedSender<ServerEvent>>,
}

impl EventHub {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Register a new subscriber and send it a connected handshake frame.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        let handshake = ServerEvent::json(
            Some("connected".to_string()),
            &Handshake {
                message: "subscribed to live updates".into(),
            },
        );
        if let Ok(frame) = handshake {
            // Receiver is still in hand, this cannot fail.
            let _ = tx.send(frame);
        }

        self.subscribers.insert(id, tx);
        Subscription { id, receiver: rx }
    }

    /// Remove a subscriber. Idempotent and safe to race with `publish`.
    pub fn unsubscribe(&self, id: Uuid) {
        self.subscribers.remove(&id);
    }

    /// Deliver an event to every current subscriber, pruning any whose
    /// channel is closed. Never reports per-subscriber failures upward.
    pub fn publish(&self, event: ServerEvent) {
        let mut dead = Vec::new();
        for entry in self.subscribers.iter() {
            if entry.value().send(event.clone()).is_err() {
                dead.push(*entry.key());
            }
        }

        for id in dead {
            self.subscribers.remove(&id);
            tracing::debug!(subscriber = %id, "pruned closed SSE subscriber");
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_event(data: &str) -> ServerEvent {
        ServerEvent::new(Some("test".into()), data.into())
    }

    #[tokio::test]
    async fn subscriber_receives_handshake_then_events() {
        let hub = EventHub::new();
        let mut sub = hub.subscribe();

        let first = sub.receiver.recv().await.unwrap();
        assert_eq!(first.event.as_deref(), Some("connected"));

        hub.publish(text_event("hello"));
        let second = sub.receiver.recv().await.unwrap();
        assert_eq!(second.data, "hello");
    }

    #[tokio::test]
    async fn publish_reaches_every_subscriber() {
        let hub = EventHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        let _ = first.receiver.recv().await;
        let _ = second.receiver.recv().await;

        hub.publish(text_event("fan-out"));
        assert_eq!(first.receiver.recv().await.unwrap().data, "fan-out");
        assert_eq!(second.receiver.recv().await.unwrap().data, "fan-out");
    }

    #[tokio::test]
    async fn closed_subscriber_is_pruned_on_publish() {
        let hub = EventHub::new();
        let dropped = hub.subscribe();
        let mut alive = hub.subscribe();
        let _ = alive.receiver.recv().await;

        drop(dropped.receiver);
        assert_eq!(hub.subscriber_count(), 2);

        hub.publish(text_event("after-drop"));
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(alive.receiver.recv().await.unwrap().data, "after-drop");
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let hub = EventHub::new();
        let sub = hub.subscribe();
        hub.unsubscribe(sub.id);
        hub.unsubscribe(sub.id);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
