//! # switchyard-core
//!
//! Core types for the Switchyard route dispatch engine.
//!
//! This crate has minimal dependencies and holds the pieces every other layer
//! builds on:
//!
//! - **Parameters**: [`Params`], the merged string mapping handed to filters
//!   and handlers, and the [`params!`] macro.
//! - **Query codec**: [`QueryConfig`], the swappable encode/decode pair, with
//!   the default form-encoding in [`encode_query`] / [`decode_query`].
//! - **Patterns**: [`RoutePattern`], compiled from `:named`, `*splat` and
//!   `(optional)` tokens into an anchored regular expression.
//! - **Filters**: [`BeforeFilter`], [`AroundFilter`], [`AfterFilter`] and
//!   [`Handler`], plus the [`Proceed`] continuation that around filters use to
//!   run the rest of a dispatch.
//! - **Events**: [`RouteEvent`] and the [`EventSink`] collaborator interface.
//!
//! # Error Types
//!
//! - [`SwitchyardError`] - Top-level error type
//! - [`DispatchError`] - Filter and handler failures
//! - [`RouterError`] - Navigation errors
//! - [`HistoryError`] - History collaborator errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod filter;
mod params;
mod pattern;
mod proceed;
mod query;

// Re-exports
pub use error::{BoxError, DispatchError, HistoryError, RouterError, SwitchyardError};
pub use event::{EventSink, RouteEvent};
pub use filter::{AfterFilter, AroundFilter, BeforeFilter, FilterResult, Handler, IntoFilterResult};
pub use params::Params;
pub use pattern::RoutePattern;
pub use proceed::{FilterChain, Proceed};
pub use query::{
    DecodeFn, EncodeFn, QueryConfig, QueryOverrides, QuerySource, decode_query, encode_query,
    percent_decode,
};
