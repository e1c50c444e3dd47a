//! # switchyard-std
//!
//! Standard implementations for the Switchyard route dispatch engine.
//!
//! This crate provides:
//! - **Route storage**: [`RouteRegistry`], in registration order and grouped by name
//! - **Reverse routing**: [`UrlBuilder`]
//! - **Filters**: [`FilterPipeline`], [`FilterScope`], [`LoggingFilter`]
//! - **Dispatch**: [`Dispatcher`] and the late-bound [`MethodTable`]
//! - **Testing utilities**: recording sinks and handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use switchyard_core;

// Modules
pub mod dispatch;
pub mod filters;
pub mod methods;
pub mod registry;
pub mod testing;
pub mod url;

pub use dispatch::{Dispatch, Dispatcher, split_path};
pub use filters::{FilterPipeline, FilterScope, LoggingFilter, Outcome, Stage};
pub use methods::MethodTable;
pub use registry::{HandlerRef, RouteEntry, RouteRegistry};
pub use url::UrlBuilder;
