//! Route announcements.
//!
//! After a dispatch the matched route is announced to external observers
//! through the [`EventSink`] collaborator interface.

use crate::params::Params;

/// A dispatched route and its merged parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEvent {
    /// The logical route name; empty for unnamed routes.
    pub name: String,
    /// The merged parameter mapping.
    pub params: Params,
}

impl RouteEvent {
    /// Create a new route event.
    pub fn new(name: impl Into<String>, params: Params) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Receives `(event_name, route)` notifications. Return values are never
/// consulted.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `EventSink`",
    label = "missing `EventSink` implementation",
    note = "Closures must take `(&str, &RouteEvent)`."
)]
pub trait EventSink: Send + Sync + 'static {
    /// Called for every fired event.
    fn trigger(&self, event: &str, route: &RouteEvent);
}

impl<F> EventSink for F
where
    F: Fn(&str, &RouteEvent) + Send + Sync + 'static,
{
    fn trigger(&self, event: &str, route: &RouteEvent) {
        (self)(event, route)
    }
}
