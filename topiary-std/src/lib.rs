//! # topiary-std
//!
//! The Topiary dispatcher and its standard companions.
//!
//! This crate provides:
//! - **Topic trie**: [`TopicNode`], [`Route`]
//! - **Dispatcher**: [`Hub`], [`HubBuilder`], [`HubConfig`]
//! - **Subscriptions**: [`Subscription`], [`SubscriptionId`]
//! - **Default hub**: [`HubRegistry`] and the process-wide functions in [`registry`]
//! - **Standard handlers**: [`handlers::LoggingHandler`]
//! - **Test helpers**: [`testing`]
//! - **Link-time registration** (`inventory` feature): [`registration`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use topiary_core;

// Modules
pub mod config;
pub mod handlers;
pub mod hub;
pub mod node;
#[cfg(feature = "inventory")]
pub mod registration;
pub mod registry;
pub mod subscription;
pub mod testing;

pub use config::{HubBuilder, HubConfig};
pub use hub::Hub;
pub use node::{Route, TopicNode};
pub use registry::{HubRegistry, LoadHook};
pub use subscription::{Subscription, SubscriptionId};

#[cfg(feature = "inventory")]
pub use inventory;
