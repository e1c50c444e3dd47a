//! # Filters and Handlers
//!
//! A route dispatch runs through three filter stages around a handler:
//!
//! 1. **Before** filters inspect the route and may stop the dispatch by
//!    returning [`FilterResult::Stop`] (a closure returning `false`).
//! 2. **Around** filters receive a [`Proceed`] continuation and decide if and
//!    when the rest of the chain runs.
//! 3. The **handler** runs once the around chain bottoms out.
//! 4. **After** filters run only when the handler executed.
//!
//! Every trait has a blanket implementation for closures, so most code never
//! implements them by hand.
//!
//! [`Proceed`]: crate::Proceed

use crate::error::BoxError;
use crate::params::Params;
use crate::proceed::Proceed;

/// Result of a before filter indicating whether the dispatch continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterResult {
    /// Continue with the next filter.
    #[default]
    Next,
    /// Abort the dispatch: no further filters, no handler.
    Stop,
}

/// Trait for converting a filter's or handler's output into a [`FilterResult`].
///
/// # Default Implementations
///
/// - `()` → Next
/// - `bool` → `true` = Next, `false` = Stop
/// - `FilterResult` → As is
/// - `Option<T>` → `None` = Next, otherwise delegates to `T`
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a filter or handler",
    label = "missing `IntoFilterResult` implementation",
    note = "Return `()`, `bool`, `FilterResult`, or a `Result` wrapping one of them."
)]
pub trait IntoFilterResult {
    /// Convert the output into a continuation decision or an error.
    fn into_filter_result(self) -> Result<FilterResult, BoxError>;
}

impl IntoFilterResult for () {
    fn into_filter_result(self) -> Result<FilterResult, BoxError> {
        Ok(FilterResult::Next)
    }
}

impl IntoFilterResult for bool {
    fn into_filter_result(self) -> Result<FilterResult, BoxError> {
        Ok(if self {
            FilterResult::Next
        } else {
            FilterResult::Stop
        })
    }
}

impl IntoFilterResult for FilterResult {
    fn into_filter_result(self) -> Result<FilterResult, BoxError> {
        Ok(self)
    }
}

impl<T: IntoFilterResult> IntoFilterResult for Option<T> {
    fn into_filter_result(self) -> Result<FilterResult, BoxError> {
        match self {
            Some(t) => t.into_filter_result(),
            None => Ok(FilterResult::Next),
        }
    }
}

impl<T, E> IntoFilterResult for Result<T, E>
where
    T: IntoFilterResult,
    E: Into<BoxError>,
{
    fn into_filter_result(self) -> Result<FilterResult, BoxError> {
        match self {
            Ok(t) => t.into_filter_result(),
            Err(e) => Err(e.into()),
        }
    }
}

/// The terminal endpoint of a dispatch.
///
/// Receives the merged parameter mapping of the matched route.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a route `Handler`",
    label = "missing `Handler` implementation",
    note = "Closures must take `&Params`; annotate the argument type: `|params: &Params| ...`."
)]
pub trait Handler: Send + Sync + 'static {
    /// Executes the handler.
    fn call(&self, params: &Params) -> Result<(), BoxError>;
}

impl<F, R> Handler for F
where
    F: Fn(&Params) -> R + Send + Sync + 'static,
    R: IntoFilterResult,
{
    fn call(&self, params: &Params) -> Result<(), BoxError> {
        (self)(params).into_filter_result().map(|_| ())
    }
}

/// A filter that runs before the around stage.
pub trait BeforeFilter: Send + Sync + 'static {
    /// Inspect the route; [`FilterResult::Stop`] aborts the dispatch.
    fn before(&self, route: &str, params: &Params) -> Result<FilterResult, BoxError>;
}

impl<F, R> BeforeFilter for F
where
    F: Fn(&str, &Params) -> R + Send + Sync + 'static,
    R: IntoFilterResult,
{
    fn before(&self, route: &str, params: &Params) -> Result<FilterResult, BoxError> {
        (self)(route, params).into_filter_result()
    }
}

/// A filter that wraps the rest of the chain.
///
/// The filter owns `proceed`. Calling [`Proceed::proceed`] runs the next
/// around filter, or the handler and after filters when none remain. The
/// continuation may be stored and called later, from any thread; dropping it
/// abandons the route.
pub trait AroundFilter: Send + Sync + 'static {
    /// Wrap the remaining chain.
    fn around(&self, proceed: Proceed, route: &str, params: &Params) -> Result<(), BoxError>;
}

impl<F, R> AroundFilter for F
where
    F: Fn(Proceed, &str, &Params) -> R + Send + Sync + 'static,
    R: IntoFilterResult,
{
    fn around(&self, proceed: Proceed, route: &str, params: &Params) -> Result<(), BoxError> {
        (self)(proceed, route, params).into_filter_result().map(|_| ())
    }
}

/// A filter that runs after the handler executed.
pub trait AfterFilter: Send + Sync + 'static {
    /// Observe the completed route.
    fn after(&self, route: &str, params: &Params) -> Result<(), BoxError>;
}

impl<F, R> AfterFilter for F
where
    F: Fn(&str, &Params) -> R + Send + Sync + 'static,
    R: IntoFilterResult,
{
    fn after(&self, route: &str, params: &Params) -> Result<(), BoxError> {
        (self)(route, params).into_filter_result().map(|_| ())
    }
}
