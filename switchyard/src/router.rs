//! The router facade.

use crate::events::EventBus;
use crate::history::{History, MemoryHistory, NavigateOptions, normalize_fragment};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use switchyard_core::{DispatchError, Handler, Params, QueryConfig, RouterError, RoutePattern};
use switchyard_std::{Dispatch, Dispatcher, FilterPipeline, HandlerRef};

/// What [`Router::go`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Go {
    /// A URL was built and handed to the history collaborator.
    Navigated {
        /// The built URL.
        url: String,
        /// The dispatch, when the fragment changed and `trigger` was set.
        dispatch: Option<Dispatch>,
    },
    /// No URL could be built; the router method of that name ran directly.
    Called,
}

/// Named routes, reverse routing and filtered dispatch over a [`History`].
///
/// # Example
///
/// ```rust
/// use switchyard::prelude::*;
///
/// let mut router = Router::default();
/// router
///     .route("search/:type", "search")
///     .route("search", "search")
///     .method("search", |params: &Params| {
///         println!("searching {:?}", params.get("q"));
///     });
///
/// let url = router.url("search", &params! { "type" => "name", "q" => "Joe" });
/// assert_eq!(url.as_deref(), Some("search/name?q=Joe"));
/// ```
pub struct Router {
    dispatcher: Dispatcher,
    history: Arc<dyn History>,
    events: Arc<EventBus>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("dispatcher", &self.dispatcher)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(MemoryHistory::new())
    }
}

impl Router {
    /// A router navigating through `history`.
    pub fn new<H: History>(history: H) -> Self {
        Self::with_shared_history(Arc::new(history))
    }

    /// A router navigating through a shared `history`.
    ///
    /// The history's event sink, if any, receives every `route` announcement.
    pub fn with_shared_history(history: Arc<dyn History>) -> Self {
        let events = Arc::new(EventBus::new());
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_shared_sink(events.clone());
        if let Some(sink) = history.event_sink() {
            dispatcher.add_global_sink(sink);
        }
        Self {
            dispatcher,
            history,
            events,
        }
    }

    /// Use `pipeline` for every dispatch.
    pub fn with_filters(mut self, pipeline: FilterPipeline) -> Self {
        self.dispatcher.set_pipeline(pipeline);
        self
    }

    /// Replace the filter pipeline.
    pub fn set_filters(&mut self, pipeline: FilterPipeline) -> &mut Self {
        self.dispatcher.set_pipeline(pipeline);
        self
    }

    /// Use `config` instead of the process-wide query config.
    pub fn with_query_config(mut self, config: QueryConfig) -> Self {
        self.dispatcher.set_query_source(config);
        self
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register `pattern` under `name`, handled by the router method `name`.
    pub fn route(&mut self, pattern: &str, name: &str) -> &mut Self {
        self.dispatcher.register(pattern, Some(name), None);
        self
    }

    /// Register `pattern` under `name` with an explicit handler.
    pub fn route_to<H: Handler>(&mut self, pattern: &str, name: &str, handler: H) -> &mut Self {
        self.dispatcher
            .register(pattern, Some(name), Some(HandlerRef::explicit(handler)));
        self
    }

    /// Register a pattern without a name. It matches but never builds URLs.
    pub fn route_unnamed<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.dispatcher
            .register(pattern, None, Some(HandlerRef::explicit(handler)));
        self
    }

    /// Register a raw regular expression under `name`, handled by the router
    /// method `name`. Captures are keyed `"0"`, `"1"`, and so on.
    pub fn route_regex(&mut self, regex: Regex, name: &str) -> &mut Self {
        self.dispatcher
            .register_pattern(RoutePattern::from_regex(regex), Some(name), None);
        self
    }

    /// Register a `(pattern, name)` table in order.
    pub fn routes<I, P, N>(&mut self, routes: I) -> &mut Self
    where
        I: IntoIterator<Item = (P, N)>,
        P: AsRef<str>,
        N: AsRef<str>,
    {
        for (pattern, name) in routes {
            self.route(pattern.as_ref(), name.as_ref());
        }
        self
    }

    /// Define or replace the router method `name`.
    pub fn method<H: Handler>(&mut self, name: &str, handler: H) -> &mut Self {
        self.dispatcher.methods_mut().define(name, handler);
        self
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// The URL for route `name` with `params`, or `None`.
    pub fn url(&self, name: &str, params: &Params) -> Option<String> {
        self.dispatcher.url(name, params)
    }

    /// Navigate to route `name`.
    ///
    /// When a URL can be built it is navigated to, with `trigger` defaulting
    /// to `true`. Otherwise the router method `name` is called with `params`.
    /// With neither, fails with [`RouterError::NoRouteOrMethod`].
    pub fn go(
        &self,
        name: &str,
        params: &Params,
        options: NavigateOptions,
    ) -> Result<Go, RouterError> {
        if let Some(url) = self.url(name, params) {
            let dispatch = self.navigate(&url, options.or_trigger(true))?;
            return Ok(Go::Navigated { url, dispatch });
        }

        if let Some(method) = self.dispatcher.methods().get(name) {
            #[cfg(feature = "tracing")]
            tracing::debug!(route = %name, "No URL for route, calling method");
            method.call(params).map_err(|source| RouterError::Method {
                name: name.to_string(),
                source,
            })?;
            return Ok(Go::Called);
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(route = %name, ?params, "No method or matching route");
        Err(RouterError::NoRouteOrMethod(name.to_string()))
    }

    /// Hand `fragment` to the history collaborator. When it changed and
    /// `trigger` is set, dispatch it.
    pub fn navigate(
        &self,
        fragment: &str,
        options: NavigateOptions,
    ) -> Result<Option<Dispatch>, RouterError> {
        let changed = self.history.navigate(fragment, &options)?;
        if !(changed && options.triggers()) {
            return Ok(None);
        }
        Ok(Some(self.load_url(Some(normalize_fragment(fragment)))?))
    }

    /// Dispatch `fragment`, or the current location when `None`.
    pub fn load_url(&self, fragment: Option<&str>) -> Result<Dispatch, RouterError> {
        let fragment = match fragment {
            Some(fragment) => fragment.to_string(),
            None => self.current_fragment(),
        };
        Ok(self.dispatcher.dispatch(&fragment)?)
    }

    /// The history fragment, with the page query string appended when the
    /// fragment does not already contain it.
    pub fn current_fragment(&self) -> String {
        let mut fragment = self.history.fragment();
        let search = self.history.search();
        if !search.is_empty() && !fragment.contains(&search) {
            fragment.push_str(&search);
        }
        fragment
    }

    /// Dispatch `path` without touching the history.
    pub fn dispatch(&self, path: &str) -> Result<Dispatch, DispatchError> {
        self.dispatcher.dispatch(path)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The router's event bus; receives `route:<name>` and `route`.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// The history collaborator.
    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::params;
    use switchyard_std::Outcome;
    use switchyard_std::testing::{CountingHandler, RecordingHandler};

    fn local() -> Router {
        Router::default().with_query_config(QueryConfig::new())
    }

    #[test]
    fn test_route_defaults_to_method() {
        let mut router = local();
        let handler = RecordingHandler::new();
        router.route("users/:id", "user").method("user", handler.clone());

        let dispatch = router.dispatch("users/7").unwrap();
        assert_eq!(dispatch.outcome(), Some(Outcome::Completed));
        assert_eq!(handler.last().unwrap(), params! { "id" => "7" });
    }

    #[test]
    fn test_routes_table_keeps_order() {
        let mut router = local();
        router.routes([("users/new", "new_user"), ("users/:id", "user")]);
        assert_eq!(router.dispatch("users/new").unwrap().route(), Some("new_user"));
    }

    #[test]
    fn test_route_regex() {
        let mut router = local();
        let handler = RecordingHandler::new();
        router
            .route_regex(Regex::new(r"^page/(\d+)$").unwrap(), "page")
            .method("page", handler.clone());

        router.dispatch("page/12").unwrap();
        assert_eq!(handler.last().unwrap(), params! { "0" => "12" });
        assert_eq!(router.url("page", &Params::new()), None);
    }

    #[test]
    fn test_go_falls_back_to_method() {
        let mut router = local();
        let counter = CountingHandler::new();
        router.method("refresh", counter.clone());

        let go = router.go("refresh", &Params::new(), NavigateOptions::new()).unwrap();
        assert_eq!(go, Go::Called);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_go_without_route_or_method() {
        let router = local();
        let err = router
            .go("missing", &Params::new(), NavigateOptions::new())
            .unwrap_err();
        assert!(matches!(err, RouterError::NoRouteOrMethod(name) if name == "missing"));
    }

    #[test]
    fn test_current_fragment_appends_search() {
        let history = MemoryHistory::at("list").with_search("?page=2");
        let router = Router::new(history.clone()).with_query_config(QueryConfig::new());
        assert_eq!(router.current_fragment(), "list?page=2");

        history.navigate("list?page=2", &NavigateOptions::new()).unwrap();
        assert_eq!(router.current_fragment(), "list?page=2");
    }
}
