//! Event subscriptions.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use switchyard_core::{EventSink, RouteEvent};

struct Subscriber {
    event: Option<String>,
    sink: Arc<dyn EventSink>,
}

/// A subscriber list that is itself an [`EventSink`].
///
/// Subscribers registered with [`on`](EventBus::on) receive one event name;
/// subscribers registered with [`on_all`](EventBus::on_all) receive every
/// event. Subscribers are called in subscription order, outside the lock, so
/// a subscriber may subscribe others.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl EventBus {
    /// Create a bus without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `sink` to `event` only.
    pub fn on<S: EventSink>(&self, event: impl Into<String>, sink: S) {
        self.push(Some(event.into()), Arc::new(sink));
    }

    /// Subscribe `sink` to every event.
    pub fn on_all<S: EventSink>(&self, sink: S) {
        self.push(None, Arc::new(sink));
    }

    /// Remove every subscriber.
    pub fn clear(&self) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, event: Option<String>, sink: Arc<dyn EventSink>) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber { event, sink });
    }
}

impl EventSink for EventBus {
    fn trigger(&self, event: &str, route: &RouteEvent) {
        let sinks: Vec<Arc<dyn EventSink>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.event.as_deref().is_none_or(|name| name == event))
            .map(|s| Arc::clone(&s.sink))
            .collect();

        for sink in sinks {
            sink.trigger(event, route);
        }
    }
}
