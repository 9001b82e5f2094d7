//! Auth lifecycle events with explicit subscribe/unsubscribe. Subscribers
//! hold an `AuthSubscription`; teardown is deterministic — either call
//! `unsubscribe` or drop the handle, exactly once.

use tokio::sync::broadcast;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { user_id: Uuid },
    SignedOut { user_id: Uuid },
}

/// Shared publisher handle, cloned into `AppState`.
#[derive(Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Delivers to current subscribers. With none attached the event is
    /// dropped, which is fine: events are advisory, not durable.
    pub fn publish(&self, event: AuthEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to auth events.
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    /// Next event, or `None` once every publisher is gone. A slow subscriber
    /// that falls behind the channel capacity skips the overwritten events
    /// and keeps going.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("auth event subscriber lagged, skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Detaches from the publisher. Consumes the handle, so a second call
    /// cannot exist; dropping the handle without calling this detaches too.
    #[allow(dead_code)]
    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_events() {
        let events = AuthEvents::new();
        let mut subscription = events.subscribe();

        let user_id = Uuid::new_v4();
        events.publish(AuthEvent::SignedIn { user_id });
        events.publish(AuthEvent::SignedOut { user_id });

        assert_eq!(subscription.next().await, Some(AuthEvent::SignedIn { user_id }));
        assert_eq!(subscription.next().await, Some(AuthEvent::SignedOut { user_id }));
    }

    #[tokio::test]
    async fn test_unsubscribe_detaches_exactly_once() {
        let events = AuthEvents::new();
        let subscription = events.subscribe();
        let second = events.subscribe();
        assert_eq!(events.subscriber_count(), 2);

        subscription.unsubscribe();
        assert_eq!(events.subscriber_count(), 1);

        drop(second);
        assert_eq!(events.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_harmless() {
        let events = AuthEvents::new();
        events.publish(AuthEvent::SignedIn {
            user_id: Uuid::new_v4(),
        });
        // a late subscriber sees only later events
        let mut subscription = events.subscribe();
        let user_id = Uuid::new_v4();
        events.publish(AuthEvent::SignedOut { user_id });
        assert_eq!(
            subscription.next().await,
            Some(AuthEvent::SignedOut { user_id })
        );
    }

    #[tokio::test]
    async fn test_each_subscriber_sees_every_event() {
        let events = AuthEvents::new();
        let mut first = events.subscribe();
        let mut second = events.subscribe();

        let user_id = Uuid::new_v4();
        events.publish(AuthEvent::SignedIn { user_id });

        assert_eq!(first.next().await, Some(AuthEvent::SignedIn { user_id }));
        assert_eq!(second.next().await, Some(AuthEvent::SignedIn { user_id }));
    }
}
