//! # topiary-core
//!
//! Core types for the Topiary hierarchical topic dispatcher.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that only implements handlers, without pulling in the trie or the hub.
//!
//! # Topics
//!
//! Topics are colon-delimited paths such as `"order:created"`. A handler
//! subscribed at `"order"` sees every notification published at
//! `"order"`, `"order:created"`, `"order:created:eu"` and so on, but a
//! handler subscribed at `"order:created"` never sees a notification
//! published at `"order"`. See [`TopicPath`].
//!
//! # Handlers
//!
//! Anything implementing [`Handler`] can subscribe: closures taking a
//! `&`[`Delivery`] and returning an [`IntoOutcome`] value, or structs.
//! A handler fails only by returning an explicit `false` (or
//! [`Outcome::Failure`], `Err(_)`).
//!
//! # Error Types
//!
//! - [`TopiaryError`] - Top-level error type
//! - [`SubscribeError`] - Subscription registration errors
//! - [`ContextError`] - Context construction errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod handler;
mod outcome;
mod path;

// Re-exports
pub use context::{Context, Delivery, FULL_PATH, PATH_KEYS, PATH_PARTS};
pub use error::{BoxError, ContextError, SubscribeError, TopiaryError};
pub use handler::{Filter, Handler, SharedHandler, handler_fn};
pub use outcome::{IntoOutcome, Outcome};
pub use path::{DELIMITER, TopicPath, split_segments};
