//! # topiary - Hierarchical Topic Dispatcher
//!
//! `topiary` is an in-process publish/subscribe hub. Subscribers register
//! handlers on colon-delimited topic paths such as `"orders:created"`.
//! Publishing to a path invokes every handler registered on that path *or
//! any ancestor of it*, root first.
//!
//! ## Quick Start
//!
//! ```rust
//! use topiary::{Context, Hub};
//!
//! let hub = Hub::new();
//!
//! // Receives "orders" and everything below it.
//! hub.subscribe_fn("orders", |d| {
//!     println!("{} (rest: {:?})", d.full_path(), d.path_parts());
//! });
//!
//! // An explicit `false` marks the publish as failed.
//! hub.subscribe_fn("orders:created", |d| d.get("order_id").is_some());
//!
//! assert!(hub.publish("orders:created", Context::new().with("order_id", 7)));
//! assert!(!hub.publish("orders:created", Context::new()));
//! ```
//!
//! ## Delivered context
//!
//! Each handler sees the publisher's fields plus two reserved entries:
//!
//! - `path_parts`: the segments below the handler's subscription path,
//! - `full_path`: the published path exactly as given.
//!
//! A publisher may name segments with `path_keys`; see
//! [`Context::with_path_keys`].
//!
//! ## Default hub
//!
//! [`default_hub`], [`subscribe`], [`publish`] and friends operate on a
//! lazily created process-wide hub. [`set_default_hub`] replaces it and
//! [`on_load`] observes replacements.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use topiary_core::{
    // Errors
    BoxError,
    // Context
    Context,
    ContextError,
    DELIMITER,
    Delivery,
    FULL_PATH,
    // Handler
    Filter,
    Handler,
    // Outcome
    IntoOutcome,
    Outcome,
    PATH_KEYS,
    PATH_PARTS,
    SharedHandler,
    SubscribeError,
    TopiaryError,
    // Paths
    TopicPath,
    handler_fn,
    split_segments,
};

pub use topiary_std::{
    Hub, HubBuilder, HubConfig, HubRegistry, LoadHook, Route, Subscription, SubscriptionId,
    TopicNode,
};

pub use topiary_std::registry::{
    default_hub, on_load, publish, set_default_hub, subscribe, subscribe_fn, unsubscribe,
};

pub use serde_json;

/// Default hub registry.
pub mod registry {
    pub use topiary_std::registry::{
        HubRegistry, LoadHook, default_hub, global, on_load, publish, set_default_hub, subscribe,
        subscribe_fn, unsubscribe,
    };
}

/// Standard handler implementations.
pub mod handlers {
    #![allow(clippy::wildcard_imports)]
    pub use topiary_std::handlers::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use topiary_std::testing::*;
}

/// Link-time handler registration.
#[cfg(feature = "inventory")]
pub mod registration {
    pub use topiary_std::registration::{
        TopicRegistration, registration_count, registrations, subscribe_registered,
    };
}

/// Prelude module - common imports for Topiary.
///
/// # Usage
///
/// ```rust
/// use topiary::prelude::*;
///
/// let hub = Hub::new();
/// hub.subscribe("a", handler_fn(|_| Outcome::Success));
/// ```
pub mod prelude {
    pub use crate::{
        Context, Delivery, Handler, Hub, IntoOutcome, Outcome, Subscription, handler_fn,
    };
}

#[cfg(feature = "macros")]
pub use topiary_macros::topic;

#[cfg(feature = "inventory")]
pub use inventory;
