//! Error types for Topiary.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`TopiaryError`] - Top-level error type for all Topiary operations
//! - [`SubscribeError`] - Errors raised while registering a subscription
//! - [`ContextError`] - Errors building a [`Context`](crate::Context) from raw JSON
//!
//! Publishing never fails: handler failures are reported through the boolean
//! returned by `publish`, not through these types.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Topiary operations.
#[derive(Error, Debug)]
pub enum TopiaryError {
    /// A subscription could not be registered.
    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),

    /// A context could not be built.
    #[error("context error: {0}")]
    Context(#[from] ContextError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur when subscribing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscribeError {
    /// No callable handler was supplied for the path.
    #[error("no callable handler supplied for `{path}`")]
    InvalidHandler {
        /// The path the subscription was requested for.
        path: String,
    },
}

/// Errors that can occur when building a context from a JSON value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The value is not a JSON object.
    #[error("context must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The `path_keys` entry is neither a string nor an array of strings and nulls.
    #[error("`path_keys` must be a string or an array of strings and nulls")]
    InvalidPathKeys,
}

impl From<BoxError> for TopiaryError {
    fn from(err: BoxError) -> Self {
        TopiaryError::Custom(err)
    }
}
