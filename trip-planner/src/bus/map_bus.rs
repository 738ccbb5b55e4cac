//! Synchronous typed publish/subscribe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use tokio::sync::mpsc;
use tracing::trace;

use super::{MapEvent, Topic};

type Handler = Arc<dyn Fn(&MapEvent) + Send + Sync>;

struct Subscriber {
    id: u64,
    topics: Vec<Topic>,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl BusInner {
    fn subscribers(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        // Handlers never run under the lock, so a poisoned list is intact.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) {
        self.subscribers().retain(|s| s.id != id);
    }
}

/// Fire-and-forget channel between the planner and the map.
///
/// Delivery is synchronous and in-process: `publish` calls every handler
/// subscribed to the event's topic before returning. Nothing is queued or
/// replayed; a subscriber that attaches late only sees later events.
///
/// Handlers may publish from inside a callback. Subscriptions added or
/// removed during a publish take effect from the next one.
///
/// Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct MapBus {
    inner: Arc<BusInner>,
}

impl MapBus {
    /// A new, independent bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide bus.
    pub fn global() -> &'static MapBus {
        static GLOBAL: OnceLock<MapBus> = OnceLock::new();
        GLOBAL.get_or_init(MapBus::new)
    }

    /// Deliver `event` to every subscriber of its topic.
    pub fn publish(&self, event: MapEvent) {
        let topic = event.topic();
        let handlers: Vec<Handler> = self
            .inner
            .subscribers()
            .iter()
            .filter(|s| s.topics.contains(&topic))
            .map(|s| Arc::clone(&s.handler))
            .collect();

        trace!(?topic, subscribers = handlers.len(), "publishing map event");

        for handler in handlers {
            handler(&event);
        }
    }

    /// Call `handler` for every event on `topics` until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, topics: &[Topic], handler: F) -> Subscription
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers().push(Subscriber {
            id,
            topics: topics.to_vec(),
            handler: Arc::new(handler),
        });

        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Forward events on `topics` into an async channel.
    ///
    /// The channel is unbounded so publishing never blocks.
    pub fn channel(&self, topics: &[Topic]) -> (Subscription, mpsc::UnboundedReceiver<MapEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(topics, move |event| {
            // A closed receiver just means the consumer has gone away.
            let _ = tx.send(event.clone());
        });
        (subscription, rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers().len()
    }
}

impl std::fmt::Debug for MapBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle for a bus subscription. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::PanelTab;
    use crate::domain::Coordinate;
    use crate::reconcile::Side;

    fn recorder(bus: &MapBus, topics: &[Topic]) -> (Subscription, Arc<Mutex<Vec<MapEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = bus.subscribe(topics, move |event| {
            sink.lock().unwrap().push(event.clone());
        });
        (subscription, seen)
    }

    #[test]
    fn delivers_only_subscribed_topics() {
        let bus = MapBus::new();
        let (_sub, seen) = recorder(&bus, &[Topic::RouteDraw]);

        bus.publish(MapEvent::MapReady);
        bus.publish(MapEvent::RouteDraw(vec![]));

        assert_eq!(*seen.lock().unwrap(), vec![MapEvent::RouteDraw(vec![])]);
    }

    #[test]
    fn drop_unsubscribes() {
        let bus = MapBus::new();
        let (sub, seen) = recorder(&bus, &Topic::ALL);
        assert_eq!(bus.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);

        bus.publish(MapEvent::MapReady);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn repeated_payloads_are_each_delivered() {
        let bus = MapBus::new();
        let (_sub, seen) = recorder(&bus, &[Topic::PanelTabChanged]);

        bus.publish(MapEvent::PanelTabChanged(PanelTab::Trip));
        bus.publish(MapEvent::PanelTabChanged(PanelTab::Trip));

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn handlers_may_publish() {
        let bus = MapBus::new();
        let (_sub, seen) = recorder(&bus, &[Topic::MapReady]);

        let inner = bus.clone();
        let _echo = bus.subscribe(&[Topic::MarkerMoved], move |_| {
            inner.publish(MapEvent::MapReady);
        });

        bus.publish(MapEvent::MarkerMoved {
            side: Side::From,
            coordinate: Coordinate::new(19.94, 50.06),
        });

        assert_eq!(*seen.lock().unwrap(), vec![MapEvent::MapReady]);
    }

    #[test]
    fn subscription_outliving_bus_is_harmless() {
        let bus = MapBus::new();
        let (sub, _seen) = recorder(&bus, &Topic::ALL);
        drop(bus);
        drop(sub);
    }

    #[tokio::test]
    async fn channel_forwards_events() {
        let bus = MapBus::new();
        let (_sub, mut rx) = bus.channel(&[Topic::MarkerMoved]);

        let moved = MapEvent::MarkerMoved {
            side: Side::To,
            coordinate: Coordinate::new(19.94, 50.06),
        };
        bus.publish(MapEvent::MapReady);
        bus.publish(moved.clone());

        assert_eq!(rx.recv().await, Some(moved));
    }

    #[test]
    fn global_is_shared() {
        let a = MapBus::global();
        let b = MapBus::global();
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
    }
}
