//! # switchyard - Named Routes for Fragment Routers
//!
//! `switchyard` adds named routes, reverse routing, query-string parameters
//! and route filters on top of a fragment-based navigation model.
//!
//! ## Quick Start
//!
//! ```rust
//! use switchyard::prelude::*;
//!
//! let history = MemoryHistory::at("");
//! let mut router = Router::new(history.clone()).with_filters(filters! {
//!     before "require_query" => |_: &str, params: &Params| params.contains_key("q"),
//!         only: ["search"];
//!     around "log" => LoggingFilter;
//! });
//!
//! router
//!     .route("search/:type", "search")
//!     .method("search", |params: &Params| {
//!         assert_eq!(params.get("type"), Some("name"));
//!     });
//!
//! let go = router
//!     .go("search", &params! { "type" => "name", "q" => "Joe" }, NavigateOptions::new())
//!     .unwrap();
//! assert_eq!(history.fragment(), "search/name?q=Joe");
//! assert!(matches!(go, Go::Navigated { dispatch: Some(_), .. }));
//! ```
//!
//! ## Crates
//!
//! - `switchyard-core`: parameters, patterns, query codec, filter traits, errors
//! - `switchyard-std`: registry, URL builder, filter pipeline, dispatcher
//! - `switchyard`: the [`Router`] facade, [`History`] and [`EventBus`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod events;
mod history;
mod macros;
mod router;

pub use events::EventBus;
pub use history::{History, MemoryHistory, NavigateOptions, Navigation, normalize_fragment};
pub use router::{Go, Router};

pub use switchyard_core::{
    // Filters
    AfterFilter,
    AroundFilter,
    BeforeFilter,
    // Errors
    BoxError,
    DispatchError,
    // Events
    EventSink,
    FilterResult,
    Handler,
    HistoryError,
    IntoFilterResult,
    // Parameters
    Params,
    Proceed,
    // Query
    QueryConfig,
    QueryOverrides,
    QuerySource,
    RouteEvent,
    RoutePattern,
    RouterError,
    SwitchyardError,
    decode_query,
    encode_query,
    params,
};

pub use switchyard_std::{
    Dispatch, Dispatcher, FilterPipeline, FilterScope, HandlerRef, LoggingFilter, MethodTable,
    Outcome, RouteRegistry, Stage, UrlBuilder,
};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use switchyard_std::testing::*;
}

/// Merge `overrides` into the process-wide query config.
///
/// Every router without its own [`QueryConfig`] picks up the change on its
/// next encode or decode. Returns the resulting config.
pub fn configure(overrides: QueryOverrides) -> QueryConfig {
    QueryConfig::configure(overrides)
}

/// Prelude module - common imports for Switchyard.
///
/// # Usage
///
/// ```rust
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Filters
        AroundFilter,
        // Errors
        BoxError,
        FilterPipeline,
        FilterScope,
        Go,
        Handler,
        History,
        LoggingFilter,
        MemoryHistory,
        NavigateOptions,
        Params,
        Proceed,
        QueryConfig,
        QueryOverrides,
        Router,
        RouterError,
        filters,
        params,
    };
}
