//! Route filters.
//!
//! - [`FilterScope`]: which routes a filter applies to
//! - [`FilterPipeline`]: ordered before/around/after filters and their invocation
//! - [`LoggingFilter`]: an around filter that logs each dispatched route

mod logging;
mod pipeline;
mod scope;

pub use logging::LoggingFilter;
pub use pipeline::{FilterPipeline, Outcome, Stage};
pub use scope::FilterScope;
