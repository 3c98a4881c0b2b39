//! Broadcast bus for [`DashboardEvent`]s.

use paydash_sdk::objects::DashboardEvent;
use tokio::sync::broadcast;
use tracing::debug;

const BUS_CAPACITY: usize = 64;

/// Typed publish/subscribe channel shared by all dashboard components.
///
/// Publishing never fails: an event with no subscribers is dropped.
/// Slow subscribers may observe `RecvError::Lagged` and must resync from
/// the dashboard state.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: DashboardEvent) {
        debug!(?event, "Publishing dashboard event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let event = DashboardEvent::OfframpSucceeded {
            amount: Decimal::new(1050, 2),
        };
        bus.publish(event.clone());

        assert_eq!(a.recv().await.unwrap(), event);
        assert_eq!(b.recv().await.unwrap(), event);
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.publish(DashboardEvent::DepositAddressDiscovered {
            address: "0xabc".to_owned(),
        });
    }
}
