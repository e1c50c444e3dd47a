//! Testing utilities for Switchyard.
//!
//! This module provides recorders that make it easy to assert on what a
//! dispatch did.
//!
//! # Features
//!
//! - [`RecordingSink`]: an event sink that records every `(event, route)` pair
//! - [`CountingHandler`]: a handler that counts its calls
//! - [`RecordingHandler`]: a handler that records the parameters it receives
//! - [`OrderLog`]: a shared log for asserting filter and handler ordering

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use switchyard_core::{
    AfterFilter, AroundFilter, BeforeFilter, BoxError, EventSink, Handler, Params, Proceed,
    RouteEvent,
};

// ============================================================================
// Recording Sink
// ============================================================================

/// An event sink that records every event it receives.
///
/// # Example
///
/// ```rust,ignore
/// let sink = RecordingSink::new();
/// router.events().on_all(sink.clone());
///
/// router.load_url(Some("search/joe"));
///
/// assert_eq!(sink.names(), vec!["route:search", "route"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<(String, RouteEvent)>>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<(String, RouteEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// The recorded event names, in order.
    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventSink for RecordingSink {
    fn trigger(&self, event: &str, route: &RouteEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), route.clone()));
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// A handler that counts how many times it was called.
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current call count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Handler for CountingHandler {
    fn call(&self, _params: &Params) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A handler that records every parameter mapping it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<Params>>>,
}

impl RecordingHandler {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded mappings.
    pub fn calls(&self) -> Vec<Params> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent mapping.
    pub fn last(&self) -> Option<Params> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Get the number of calls.
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Handler for RecordingHandler {
    fn call(&self, params: &Params) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(params.clone());
        Ok(())
    }
}

// ============================================================================
// Order Log
// ============================================================================

/// A shared, ordered log of labels.
///
/// Hands out filters and handlers that push their label when they run, so a
/// test can assert on the exact run order of a dispatch.
#[derive(Debug, Clone, Default)]
pub struct OrderLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl OrderLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label.
    pub fn push(&self, label: impl Into<String>) {
        self.entries.lock().unwrap().push(label.into());
    }

    /// Get a clone of the logged labels.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// A handler logging `label`.
    pub fn handler(&self, label: &str) -> impl Handler + use<> {
        let (log, label) = (self.clone(), label.to_string());
        move |_: &Params| log.push(label.clone())
    }

    /// A before filter logging `label` and continuing.
    pub fn before(&self, label: &str) -> impl BeforeFilter + use<> {
        let (log, label) = (self.clone(), label.to_string());
        move |_: &str, _: &Params| log.push(label.clone())
    }

    /// An around filter logging `label` and proceeding immediately.
    pub fn around(&self, label: &str) -> impl AroundFilter + use<> {
        let (log, label) = (self.clone(), label.to_string());
        move |proceed: Proceed, _: &str, _: &Params| {
            log.push(label.clone());
            proceed.proceed()
        }
    }

    /// An after filter logging `label`.
    pub fn after(&self, label: &str) -> impl AfterFilter + use<> {
        let (log, label) = (self.clone(), label.to_string());
        move |_: &str, _: &Params| log.push(label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        let event = RouteEvent::new("home", Params::new());
        sink.trigger("route:home", &event);
        sink.trigger("route", &event);

        assert_eq!(sink.names(), vec!["route:home", "route"]);
        assert_eq!(sink.events()[0].1, event);
        sink.clear();
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_recording_handler() {
        let handler = RecordingHandler::new();
        handler.call(&Params::new().with("id", "7")).unwrap();
        assert_eq!(handler.count(), 1);
        assert_eq!(handler.last().unwrap().get("id"), Some("7"));
    }

    #[test]
    fn test_order_log() {
        let log = OrderLog::new();
        log.before("a").before("home", &Params::new()).unwrap();
        log.handler("b").call(&Params::new()).unwrap();
        assert_eq!(log.entries(), vec!["a", "b"]);
    }
}
