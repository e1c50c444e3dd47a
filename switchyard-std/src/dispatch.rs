//! Path dispatch.
//!
//! [`Dispatcher`] ties the registry, the method table, the filter pipeline and
//! the event sinks together. Dispatching a path:
//!
//! 1. splits off the query string at the first `?`;
//! 2. finds the first registered route matching the base path;
//! 3. merges decoded query parameters with the path captures (path wins);
//! 4. resolves the handler, runs it through the filter pipeline;
//! 5. announces `route:<name>` and `route` to the router sinks, then `route`
//!    to the global sinks.

use crate::filters::{FilterPipeline, Outcome};
use crate::methods::MethodTable;
use crate::registry::{HandlerRef, RouteRegistry};
use crate::url::UrlBuilder;
use std::fmt;
use std::sync::Arc;
use switchyard_core::{
    DispatchError, EventSink, Handler, Params, QueryConfig, QuerySource, RouteEvent, RoutePattern,
};

/// Split `path` into its base and the query string after the first `?`.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (path, None),
    }
}

/// The result of dispatching a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No registered route matched.
    NotFound,
    /// A route matched and went through the pipeline.
    Matched {
        /// The route name; empty for unnamed routes.
        route: String,
        /// The merged parameter mapping.
        params: Params,
        /// How far the pipeline got.
        outcome: Outcome,
    },
}

impl Dispatch {
    /// Whether a route matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, Dispatch::Matched { .. })
    }

    /// The matched route name.
    pub fn route(&self) -> Option<&str> {
        match self {
            Dispatch::Matched { route, .. } => Some(route),
            Dispatch::NotFound => None,
        }
    }

    /// The merged parameters of the matched route.
    pub fn params(&self) -> Option<&Params> {
        match self {
            Dispatch::Matched { params, .. } => Some(params),
            Dispatch::NotFound => None,
        }
    }

    /// The pipeline outcome of the matched route.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Dispatch::Matched { outcome, .. } => Some(*outcome),
            Dispatch::NotFound => None,
        }
    }
}

fn ignore(_: &Params) {}

/// Matches paths against registered routes and runs their handlers.
#[derive(Default)]
pub struct Dispatcher {
    registry: RouteRegistry,
    methods: MethodTable,
    pipeline: FilterPipeline,
    query: QuerySource,
    sinks: Vec<Arc<dyn EventSink>>,
    global_sinks: Vec<Arc<dyn EventSink>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("methods", &self.methods)
            .field("pipeline", &self.pipeline)
            .field("query", &self.query)
            .field("sinks", &self.sinks.len())
            .field("global_sinks", &self.global_sinks.len())
            .finish()
    }
}

impl Dispatcher {
    /// An empty dispatcher reading the global query config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. See [`RouteRegistry::register`].
    pub fn register(
        &mut self,
        pattern: &str,
        name: Option<&str>,
        handler: Option<HandlerRef>,
    ) -> Arc<RoutePattern> {
        self.registry.register(pattern, name, handler)
    }

    /// Register a compiled pattern. See [`RouteRegistry::register_pattern`].
    pub fn register_pattern(
        &mut self,
        pattern: RoutePattern,
        name: Option<&str>,
        handler: Option<HandlerRef>,
    ) -> Arc<RoutePattern> {
        self.registry.register_pattern(pattern, name, handler)
    }

    /// The route registry.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// The method table.
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Mutable access to the method table.
    pub fn methods_mut(&mut self) -> &mut MethodTable {
        &mut self.methods
    }

    /// The filter pipeline.
    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    /// Replace the filter pipeline.
    pub fn set_pipeline(&mut self, pipeline: FilterPipeline) {
        self.pipeline = pipeline;
    }

    /// Where query functions come from.
    pub fn query_source(&self) -> &QuerySource {
        &self.query
    }

    /// Set where query functions come from.
    pub fn set_query_source(&mut self, query: impl Into<QuerySource>) {
        self.query = query.into();
    }

    /// The query config currently in effect.
    pub fn query_config(&self) -> QueryConfig {
        self.query.resolve()
    }

    /// Add a router-level sink; it receives `route:<name>` and `route`.
    pub fn add_sink<S: EventSink>(&mut self, sink: S) {
        self.sinks.push(Arc::new(sink));
    }

    /// Add a shared router-level sink.
    pub fn add_shared_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Add a global sink; it receives `route` only.
    pub fn add_global_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.global_sinks.push(sink);
    }

    /// Build the URL for route `name`. See [`UrlBuilder::build`].
    pub fn url(&self, name: &str, params: &Params) -> Option<String> {
        UrlBuilder::new(&self.registry, self.query.resolve()).build(name, params)
    }

    /// Dispatch `path` (a fragment, optionally with a query string).
    ///
    /// Returns [`Dispatch::NotFound`] when no route matches; nothing runs and
    /// nothing is announced. Events fire once the pipeline returns, whatever
    /// its outcome, but not when it fails.
    pub fn dispatch(&self, path: &str) -> Result<Dispatch, DispatchError> {
        let (base, query) = split_path(path);

        #[cfg(feature = "tracing")]
        tracing::trace!(path = %path, routes = self.registry.len(), "Dispatching path");

        let Some((entry, captures)) = self.registry.resolve(base) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(path = %path, "No route matched");
            return Ok(Dispatch::NotFound);
        };

        let mut params = match query {
            Some(query) if !query.is_empty() => self.query.resolve().decode(query),
            _ => Params::new(),
        };
        for (name, value) in captures {
            if value.is_some() {
                params.set(name, value);
            }
        }

        let route = entry.name().unwrap_or_default().to_string();
        let handler = self.handler_for(entry.handler(), &route);

        #[cfg(feature = "tracing")]
        tracing::debug!(route = %route, pattern = %entry.pattern(), ?params, "Route matched");

        let outcome = self
            .pipeline
            .invoke(&route, params.clone(), handler)
            .map_err(DispatchError::Filter)?;

        self.announce(&route, &params);

        Ok(Dispatch::Matched {
            route,
            params,
            outcome,
        })
    }

    fn handler_for(&self, handler: Option<&HandlerRef>, route: &str) -> Arc<dyn Handler> {
        match handler.and_then(|handler| self.methods.resolve(handler)) {
            Some(handler) => handler,
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(route = %route, "Route has no handler");
                #[cfg(not(feature = "tracing"))]
                let _ = route;
                Arc::new(ignore) as Arc<dyn Handler>
            }
        }
    }

    fn announce(&self, route: &str, params: &Params) {
        let event = RouteEvent::new(route, params.clone());
        let scoped = format!("route:{route}");

        for sink in &self.sinks {
            sink.trigger(&scoped, &event);
        }
        for sink in &self.sinks {
            sink.trigger("route", &event);
        }
        for sink in &self.global_sinks {
            sink.trigger("route", &event);
        }
    }
}
