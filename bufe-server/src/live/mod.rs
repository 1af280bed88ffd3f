//! LiveHub: in-process fan-out of dashboard events
//!
//! ```text
//! OrderService / CatalogService
//!       │ publish("bufe_orders", DashboardEvent)   (500 ms budget, errors logged)
//!       ▼
//! LiveHub
//!   └── groups: group name → broadcast::Sender<DashboardEvent>
//!         │
//!         ▼
//!   Dashboard WS handler (admin-gated subscribe → push)
//! ```
//!
//! Delivery is at-most-once. Events are invalidation hints; a subscriber that
//! falls behind is told to resync instead of receiving the missed events.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use shared::dashboard::DashboardEvent;
use tokio::sync::broadcast;

/// Group every admin dashboard joins
pub const ORDERS_GROUP: &str = "bufe_orders";

/// Upper bound for one publish call made by a service
pub const PUBLISH_TIMEOUT: Duration = Duration::from_millis(500);

/// Broadcast channel capacity, enough to buffer a burst while a socket is busy
const BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("publish timed out after {0:?}")]
    Timeout(Duration),
}

/// Publishes events to named groups
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn publish(&self, group: &str, event: DashboardEvent) -> Result<(), PublishError>;
}

/// Publish with a timeout; failures are logged and swallowed.
///
/// Called after the change is persisted. A lost event never fails the request.
pub async fn publish_best_effort(broadcaster: &dyn Broadcaster, event: DashboardEvent) {
    let kind = event.kind();
    let result = tokio::time::timeout(PUBLISH_TIMEOUT, broadcaster.publish(ORDERS_GROUP, event))
        .await
        .unwrap_or(Err(PublishError::Timeout(PUBLISH_TIMEOUT)));

    if let Err(e) = result {
        tracing::warn!(event = kind, error = %e, "Dashboard event not delivered");
    }
}

/// In-process broadcaster over `tokio::sync::broadcast`
#[derive(Clone, Default)]
pub struct LiveHub {
    /// group name → sender
    groups: Arc<DashMap<String, broadcast::Sender<DashboardEvent>>>,
}

impl LiveHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a group. Only called after the admin gate has passed.
    pub fn subscribe(&self, group: &str) -> broadcast::Receiver<DashboardEvent> {
        self.sender(group).subscribe()
    }

    pub fn subscriber_count(&self, group: &str) -> usize {
        self.groups
            .get(group)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    fn sender(&self, group: &str) -> broadcast::Sender<DashboardEvent> {
        self.groups
            .entry(group.to_string())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl Broadcaster for LiveHub {
    async fn publish(&self, group: &str, event: DashboardEvent) -> Result<(), PublishError> {
        let delivered = self.sender(group).send(event).unwrap_or(0);
        tracing::debug!(group, delivered, "Dashboard event published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ProductRepr;

    fn product(id: i64) -> ProductRepr {
        ProductRepr {
            id,
            nev: "Túró Rudi".to_string(),
            kategoria_id: 1,
            kategoria_nev: "Hűtött".to_string(),
            ar: 290,
            max_rendelesenkent: 4,
            hutve: true,
            elerheto: true,
            kisult: false,
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_ok() {
        let hub = LiveHub::new();
        assert_eq!(hub.subscriber_count(ORDERS_GROUP), 0);
        hub.publish(ORDERS_GROUP, DashboardEvent::OrderArchiveAll)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn every_subscriber_receives_event() {
        let hub = LiveHub::new();
        let mut a = hub.subscribe(ORDERS_GROUP);
        let mut b = hub.subscribe(ORDERS_GROUP);
        assert_eq!(hub.subscriber_count(ORDERS_GROUP), 2);

        hub.publish(ORDERS_GROUP, DashboardEvent::ProductNew(product(3)))
            .await
            .unwrap();

        assert_eq!(
            a.recv().await.unwrap(),
            DashboardEvent::ProductNew(product(3))
        );
        assert_eq!(
            b.recv().await.unwrap(),
            DashboardEvent::ProductNew(product(3))
        );
    }

    #[tokio::test]
    async fn groups_are_isolated() {
        let hub = LiveHub::new();
        let mut orders = hub.subscribe(ORDERS_GROUP);
        let mut other = hub.subscribe("other");

        hub.publish("other", DashboardEvent::OrderArchiveAll)
            .await
            .unwrap();

        assert!(matches!(
            other.recv().await.unwrap(),
            DashboardEvent::OrderArchiveAll
        ));
        assert!(matches!(
            orders.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn slow_subscriber_lags() {
        let hub = LiveHub::new();
        let mut rx = hub.subscribe(ORDERS_GROUP);

        for _ in 0..BROADCAST_CAPACITY + 5 {
            hub.publish(ORDERS_GROUP, DashboardEvent::OrderArchiveAll)
                .await
                .unwrap();
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(5))
        ));
    }

    struct FailingBroadcaster;

    #[async_trait]
    impl Broadcaster for FailingBroadcaster {
        async fn publish(&self, _: &str, _: DashboardEvent) -> Result<(), PublishError> {
            Err(PublishError::Timeout(Duration::ZERO))
        }
    }

    struct StalledBroadcaster;

    #[async_trait]
    impl Broadcaster for StalledBroadcaster {
        async fn publish(&self, _: &str, _: DashboardEvent) -> Result<(), PublishError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn best_effort_swallows_failure() {
        publish_best_effort(&FailingBroadcaster, DashboardEvent::OrderArchiveAll).await;
    }

    #[tokio::test(start_paused = true)]
    async fn best_effort_gives_up_after_timeout() {
        publish_best_effort(&StalledBroadcaster, DashboardEvent::OrderArchiveAll).await;
    }
}
