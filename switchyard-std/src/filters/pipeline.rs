//! The before/around/after filter pipeline.

use super::scope::FilterScope;
use std::fmt;
use std::sync::Arc;
use switchyard_core::{
    AfterFilter, AroundFilter, BeforeFilter, BoxError, FilterChain, FilterResult, Handler, Params,
};

/// A filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Runs first and may stop the dispatch.
    Before,
    /// Wraps the handler through a continuation.
    Around,
    /// Runs once the handler executed.
    After,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Before => "before",
            Stage::Around => "around",
            Stage::After => "after",
        })
    }
}

/// What happened to a dispatched route by the time [`FilterPipeline::invoke`]
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler and every after filter ran.
    Completed,
    /// A before filter stopped the dispatch.
    Halted,
    /// An around filter has not called its continuation (yet).
    Pending,
}

struct FilterSpec<F: ?Sized> {
    name: String,
    filter: Arc<F>,
    scope: FilterScope,
}

impl<F: ?Sized> FilterSpec<F> {
    fn new(name: impl Into<String>, filter: Arc<F>, scope: FilterScope) -> Self {
        Self {
            name: name.into(),
            filter,
            scope,
        }
    }
}

impl<F: ?Sized> Clone for FilterSpec<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            filter: Arc::clone(&self.filter),
            scope: self.scope.clone(),
        }
    }
}

impl<F: ?Sized> fmt::Debug for FilterSpec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Ordered filters for each stage.
///
/// Filters run in the order they were added. Each carries a name, used in
/// diagnostics, and a [`FilterScope`] checked against the dispatched route's
/// name.
///
/// # Example
///
/// ```rust
/// use switchyard_std::{FilterPipeline, FilterScope, LoggingFilter};
/// use switchyard_core::Params;
///
/// let pipeline = FilterPipeline::new()
///     .before_scoped(
///         "require_login",
///         |_: &str, params: &Params| params.contains_key("token"),
///         FilterScope::all().except(["login"]),
///     )
///     .around("log", LoggingFilter);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    before: Vec<FilterSpec<dyn BeforeFilter>>,
    around: Vec<FilterSpec<dyn AroundFilter>>,
    after: Vec<FilterSpec<dyn AfterFilter>>,
}

impl FilterPipeline {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a before filter for every route.
    pub fn before<F: BeforeFilter>(self, name: impl Into<String>, filter: F) -> Self {
        self.before_scoped(name, filter, FilterScope::all())
    }

    /// Add a scoped before filter.
    pub fn before_scoped<F: BeforeFilter>(
        mut self,
        name: impl Into<String>,
        filter: F,
        scope: FilterScope,
    ) -> Self {
        let filter: Arc<dyn BeforeFilter> = Arc::new(filter);
        self.before.push(FilterSpec::new(name, filter, scope));
        self
    }

    /// Add an around filter for every route.
    pub fn around<F: AroundFilter>(self, name: impl Into<String>, filter: F) -> Self {
        self.around_scoped(name, filter, FilterScope::all())
    }

    /// Add a scoped around filter.
    pub fn around_scoped<F: AroundFilter>(
        mut self,
        name: impl Into<String>,
        filter: F,
        scope: FilterScope,
    ) -> Self {
        let filter: Arc<dyn AroundFilter> = Arc::new(filter);
        self.around.push(FilterSpec::new(name, filter, scope));
        self
    }

    /// Add an after filter for every route.
    pub fn after<F: AfterFilter>(self, name: impl Into<String>, filter: F) -> Self {
        self.after_scoped(name, filter, FilterScope::all())
    }

    /// Add a scoped after filter.
    pub fn after_scoped<F: AfterFilter>(
        mut self,
        name: impl Into<String>,
        filter: F,
        scope: FilterScope,
    ) -> Self {
        let filter: Arc<dyn AfterFilter> = Arc::new(filter);
        self.after.push(FilterSpec::new(name, filter, scope));
        self
    }

    /// Whether no filter is declared.
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.around.is_empty() && self.after.is_empty()
    }

    /// Names of the `stage` filters applicable to `route`, in run order.
    pub fn filters_for(&self, stage: Stage, route: &str) -> Vec<&str> {
        fn applicable<'a, F: ?Sized>(specs: &'a [FilterSpec<F>], route: &str) -> Vec<&'a str> {
            specs
                .iter()
                .filter(|spec| spec.scope.applies(route))
                .map(|spec| spec.name.as_str())
                .collect()
        }

        match stage {
            Stage::Before => applicable(&self.before, route),
            Stage::Around => applicable(&self.around, route),
            Stage::After => applicable(&self.after, route),
        }
    }

    /// Run `handler` for `route` through the applicable filters.
    ///
    /// 1. Before filters run in order; the first [`FilterResult::Stop`]
    ///    returns [`Outcome::Halted`] without running anything else.
    /// 2. Around filters nest, the first added outermost. The innermost
    ///    continuation runs the handler, then the after filters.
    ///
    /// Any filter or handler error aborts the rest of the chain and is
    /// returned as is.
    pub fn invoke(
        &self,
        route: &str,
        params: Params,
        handler: Arc<dyn Handler>,
    ) -> Result<Outcome, BoxError> {
        for spec in self.before.iter().filter(|spec| spec.scope.applies(route)) {
            if spec.filter.before(route, &params)? == FilterResult::Stop {
                #[cfg(feature = "tracing")]
                tracing::debug!(route = %route, filter = %spec.name, "Route halted by before filter");
                return Ok(Outcome::Halted);
            }
        }

        let around = self
            .around
            .iter()
            .filter(|spec| spec.scope.applies(route))
            .map(|spec| Arc::clone(&spec.filter))
            .collect();
        let after = self
            .after
            .iter()
            .filter(|spec| spec.scope.applies(route))
            .map(|spec| Arc::clone(&spec.filter))
            .collect();

        let chain = Arc::new(
            FilterChain::new(route, params, handler)
                .with_around(around)
                .with_after(after),
        );
        chain.start().proceed()?;

        if chain.handled() {
            Ok(Outcome::Completed)
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(route = %route, "Route pending on around filter");
            Ok(Outcome::Pending)
        }
    }
}
