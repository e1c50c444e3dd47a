//! Route registry.
//!
//! Every registered route is kept twice:
//!
//! - in the global list, in registration order, which the dispatcher scans
//!   for incoming paths (first match wins, so catch-alls go last);
//! - in a per-name bucket sorted by descending parameter count, which the URL
//!   builder scans to pick the most specific pattern.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use switchyard_core::{Handler, RoutePattern};

/// How a route finds its handler.
#[derive(Clone)]
pub enum HandlerRef {
    /// A handler supplied at registration.
    Explicit(Arc<dyn Handler>),
    /// A router method looked up by name at dispatch time.
    Method(String),
}

impl HandlerRef {
    /// Wrap an explicit handler.
    pub fn explicit<H: Handler>(handler: H) -> Self {
        HandlerRef::Explicit(Arc::new(handler))
    }

    /// Refer to a router method.
    pub fn method(name: impl Into<String>) -> Self {
        HandlerRef::Method(name.into())
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Explicit(_) => f.write_str("Explicit(..)"),
            HandlerRef::Method(name) => f.debug_tuple("Method").field(name).finish(),
        }
    }
}

/// A registered route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: Arc<RoutePattern>,
    name: Option<String>,
    handler: Option<HandlerRef>,
}

impl RouteEntry {
    /// The compiled pattern.
    pub fn pattern(&self) -> &Arc<RoutePattern> {
        &self.pattern
    }

    /// The logical name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The handler reference, if any.
    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }
}

/// Parameter captures of a matched route, in token order.
pub type Captures = Vec<(String, Option<String>)>;

/// Stores compiled routes for matching and reverse lookup.
///
/// Write-once at setup, read-only during dispatch: registration takes
/// `&mut self`, so it cannot interleave with a dispatch borrowing the registry.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<Arc<RouteEntry>>,
    named: HashMap<String, Vec<Arc<RouteEntry>>>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a pattern.
    ///
    /// Named routes without an explicit handler default to the router method
    /// of the same name.
    pub fn register(
        &mut self,
        pattern: &str,
        name: Option<&str>,
        handler: Option<HandlerRef>,
    ) -> Arc<RoutePattern> {
        self.register_pattern(RoutePattern::compile(pattern), name, handler)
    }

    /// Register an already compiled pattern.
    ///
    /// Patterns that cannot be reverse-built (raw regex routes) are matchable
    /// but never added to the name buckets.
    pub fn register_pattern(
        &mut self,
        pattern: RoutePattern,
        name: Option<&str>,
        handler: Option<HandlerRef>,
    ) -> Arc<RoutePattern> {
        let pattern = Arc::new(pattern);
        let handler = handler.or_else(|| name.map(HandlerRef::method));
        let entry = Arc::new(RouteEntry {
            pattern: Arc::clone(&pattern),
            name: name.map(str::to_string),
            handler,
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(pattern = %pattern, name = ?name, "Registered route");

        self.routes.push(Arc::clone(&entry));

        if let Some(name) = name.filter(|_| pattern.is_reverse_routable()) {
            let bucket = self.named.entry(name.to_string()).or_default();
            bucket.push(entry);
            // stable: ties keep registration order
            bucket.sort_by_key(|entry| Reverse(entry.pattern.param_names().len()));
        }

        pattern
    }

    /// Entries registered under `name`, most specific first.
    pub fn lookup(&self, name: &str) -> &[Arc<RouteEntry>] {
        self.named.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first route, in registration order, matching `base`, with its
    /// captures.
    pub fn resolve(&self, base: &str) -> Option<(&Arc<RouteEntry>, Captures)> {
        self.routes
            .iter()
            .find_map(|entry| entry.pattern.extract(base).map(|captures| (entry, captures)))
    }

    /// Every route in registration order.
    pub fn routes(&self) -> &[Arc<RouteEntry>] {
        &self.routes
    }

    /// Names with at least one reverse-routable pattern.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
