/**
 * Real-time Event Broadcasting
 *
 * This module provides the broadcast type definition and the helper used by
 * mutation handlers to publish feed events to every subscriber.
 *
 * # Broadcasting
 *
 * Events are broadcast using `tokio::sync::broadcast`, which provides
 * a multi-producer, multi-consumer channel. All subscribers receive
 * a copy of each event. Delivery is at-most-once: there is no replay and a
 * subscriber that falls more than the channel capacity behind skips the
 * events it missed.
 */

use tokio::sync::broadcast;

use crate::shared::FeedEvent;

/// Feed event broadcast
///
/// This type represents a broadcast channel for feed events.
/// It can be cloned and shared across handlers.
///
/// # Usage
///
/// ```rust
/// use feedline::backend::realtime::FeedEventBroadcast;
/// use feedline::shared::FeedEvent;
/// use tokio::sync::broadcast;
///
/// let (tx, _) = broadcast::channel::<FeedEvent>(1000);
/// let broadcast: FeedEventBroadcast = tx;
/// ```
pub type FeedEventBroadcast = broadcast::Sender<FeedEvent>;

/// Broadcast a feed event to all subscribers
///
/// Sending with no subscribers is not an error: the event is dropped and
/// the request that produced it still succeeds.
///
/// # Returns
///
/// Number of active subscribers that received the event (0 if no subscribers)
pub fn broadcast_event(broadcast_tx: &FeedEventBroadcast, event: FeedEvent) -> usize {
    let name = event.name();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::info!("[Realtime] {} broadcast to {} subscribers", name, subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers to receive {}", name);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{LikeUpdate, UserSummary};

    fn like_event() -> FeedEvent {
        FeedEvent::PostLiked(LikeUpdate {
            post_id: "p1".to_string(),
            likes: vec![UserSummary {
                id: "u1".to_string(),
                username: "bob".to_string(),
                avatar: None,
            }],
        })
    }

    #[tokio::test]
    async fn test_broadcast_event_no_subscribers() {
        let (tx, _) = broadcast::channel::<FeedEvent>(100);
        assert_eq!(broadcast_event(&tx, like_event()), 0);
    }

    #[tokio::test]
    async fn test_broadcast_multiple_subscribers() {
        let (tx, _) = broadcast::channel::<FeedEvent>(100);
        let mut sub1 = tx.subscribe();
        let mut sub2 = tx.subscribe();

        assert_eq!(broadcast_event(&tx, like_event()), 2);
        assert_eq!(sub1.recv().await.unwrap(), like_event());
        assert_eq!(sub2.recv().await.unwrap(), like_event());
    }
}
