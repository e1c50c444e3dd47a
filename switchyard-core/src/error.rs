//! Error types for Switchyard.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SwitchyardError`] - Top-level error type for all Switchyard operations
//! - [`DispatchError`] - Errors raised while running filters and handlers
//! - [`RouterError`] - Errors from the navigation API
//! - [`HistoryError`] - Errors reported by the history collaborator

use thiserror::Error;

/// A boxed error type for filter and handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Switchyard operations.
#[derive(Error, Debug)]
pub enum SwitchyardError {
    /// An error occurred during dispatch.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// An error occurred in the navigation API.
    #[error("router error: {0}")]
    Router(#[from] RouterError),

    /// The history collaborator rejected an operation.
    #[error("history error: {0}")]
    History(#[from] HistoryError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur while dispatching a path.
///
/// Unmatched paths are not errors; they are reported as
/// "not handled" by the dispatcher.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A before, around or after filter, or the handler itself, failed.
    ///
    /// The underlying error is carried unchanged; remaining stages did not run.
    #[error(transparent)]
    Filter(BoxError),
}

/// Errors raised by the navigation API.
#[derive(Error, Debug)]
pub enum RouterError {
    /// `go` found neither a reverse-routable pattern nor a method.
    #[error("no method or matching route exists for `{0}`")]
    NoRouteOrMethod(String),

    /// A router method called directly by `go` failed.
    #[error("method `{name}` failed")]
    Method {
        /// The method name.
        name: String,
        /// The failure raised by the method.
        #[source]
        source: BoxError,
    },

    /// Dispatching the navigated path failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The history collaborator rejected the navigation.
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Errors reported by a history collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The collaborator refused to change the URL.
    #[error("navigation rejected: {0}")]
    Rejected(String),
}

impl From<BoxError> for SwitchyardError {
    fn from(err: BoxError) -> Self {
        SwitchyardError::Custom(err)
    }
}

impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        DispatchError::Filter(err)
    }
}
