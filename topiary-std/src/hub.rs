//! # Hub
//!
//! The dispatcher: owns the root [`TopicNode`] and exposes
//! subscribe / unsubscribe / publish.
//!
//! # Example
//!
//! ```rust
//! use topiary_core::Context;
//! use topiary_std::Hub;
//!
//! let hub = Hub::new();
//! hub.subscribe_fn("order", |d| {
//!     assert_eq!(d.full_path(), "order:created");
//!     assert_eq!(d.path_parts(), ["created"]);
//!     assert_eq!(d.get_str("kind"), Some("order"));
//! });
//!
//! let ctx = Context::new().with_path_keys([Some("kind")]);
//! assert!(hub.publish("order:created", ctx));
//! ```
//!
//! # Re-entrancy
//!
//! `publish` snapshots the matched subscriptions and releases the trie lock
//! before calling any handler, so handlers may subscribe, unsubscribe or
//! publish on the same hub. Such changes apply to later publishes only.

use crate::{
    config::{HubBuilder, HubConfig},
    node::TopicNode,
    subscription::Subscription,
};
use parking_lot::RwLock;
use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};
use topiary_core::{
    Context, Delivery, Handler, IntoOutcome, SharedHandler, SubscribeError, split_segments,
};

/// An in-process publish/subscribe dispatcher over hierarchical topics.
pub struct Hub {
    root: RwLock<TopicNode>,
    primary: AtomicBool,
    config: HubConfig,
}

impl Hub {
    /// Create a hub with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with the given configuration.
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            root: RwLock::new(TopicNode::new()),
            primary: AtomicBool::new(false),
            config,
        }
    }

    /// Start building a hub.
    pub fn builder() -> HubBuilder {
        HubBuilder::new()
    }

    /// The configuration.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Subscribe a handler at `path`.
    ///
    /// An empty path registers at the root, which sees every publish.
    pub fn subscribe<H: Handler>(&self, path: &str, handler: H) -> Subscription {
        self.subscribe_shared(path, handler.into_shared())
    }

    /// Subscribe a closure at `path`.
    pub fn subscribe_fn<F, R>(&self, path: &str, handler: F) -> Subscription
    where
        F: Fn(&Delivery<'_>) -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        self.subscribe(path, handler)
    }

    /// Subscribe an already type-erased handler.
    pub fn subscribe_shared(&self, path: &str, handler: SharedHandler) -> Subscription {
        let subscription = Subscription::new(path, handler);
        self.root
            .write()
            .sublevel_at(subscription.segments())
            .add(subscription.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            hub = %self.config.name,
            path = %path,
            subscription = %subscription.id(),
            "Subscribed"
        );

        subscription
    }

    /// Subscribe with an optional handler and an optional fallback.
    ///
    /// `handler` is used when present, otherwise `fallback`. When neither is
    /// present nothing is registered and
    /// [`SubscribeError::InvalidHandler`] is returned.
    ///
    /// This is the only way to get `InvalidHandler`. Passing an object that
    /// is not callable is already rejected at compile time, because only
    /// [`Handler`] implementations convert into a [`SharedHandler`].
    pub fn try_subscribe(
        &self,
        path: &str,
        handler: Option<SharedHandler>,
        fallback: Option<SharedHandler>,
    ) -> Result<Subscription, SubscribeError> {
        let handler = handler
            .or(fallback)
            .ok_or_else(|| SubscribeError::InvalidHandler {
                path: path.to_owned(),
            })?;
        Ok(self.subscribe_shared(path, handler))
    }

    /// Remove a subscription.
    ///
    /// `None` is a no-op returning `None`. Otherwise the same handle is
    /// returned, whether or not it was still registered here.
    pub fn unsubscribe(
        &self,
        subscription: impl Into<Option<Subscription>>,
    ) -> Option<Subscription> {
        let subscription = subscription.into()?;

        let mut root = self.root.write();
        let removed = root
            .sublevel_mut(subscription.segments())
            .is_some_and(|node| node.remove(&subscription));
        if removed && self.config.prune_empty_nodes {
            root.prune(subscription.segments());
        }
        drop(root);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            hub = %self.config.name,
            path = %subscription.path(),
            subscription = %subscription.id(),
            removed,
            "Unsubscribed"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = removed;

        Some(subscription)
    }

    /// Publish to `path`.
    ///
    /// Every subscription at `path` or one of its ancestors runs, root first.
    /// A `path_keys` entry in `context` is unpacked into named fields before
    /// delivery. Publisher-supplied `path_parts` and `full_path` are dropped;
    /// each handler sees the values for its own depth. Returns `false` if any
    /// handler explicitly failed.
    pub fn publish(&self, path: &str, mut context: Context) -> bool {
        let segments = split_segments(path);
        context.unpack_path_keys(&segments);
        context.remove_reserved();

        let route = self.root.read().route(&segments);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            hub = %self.config.name,
            path = %path,
            nodes = route.depth(),
            handlers = route.handler_count(),
            "Publishing"
        );

        route.deliver(path, &context)
    }

    /// Publish to `path` with an empty context.
    pub fn publish_path(&self, path: &str) -> bool {
        self.publish(path, Context::new())
    }

    /// Whether this hub is currently the default of a [`HubRegistry`](crate::registry::HubRegistry).
    pub fn is_primary(&self) -> bool {
        self.primary.load(Ordering::Acquire)
    }

    /// Set the primary flag, returning whether it went from `false` to `true`.
    pub(crate) fn set_primary(&self, primary: bool) -> bool {
        let was = self.primary.swap(primary, Ordering::AcqRel);
        primary && !was
    }

    /// Number of registered subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.root.read().total_subscriptions()
    }

    /// Number of trie nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.root.read().node_count()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("name", &self.config.name)
            .field("primary", &self.is_primary())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use topiary_core::{Handler, Outcome, handler_fn};

    fn counter(hub: &Hub, path: &str) -> (Subscription, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let sub = hub.subscribe_fn(path, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (sub, count)
    }

    #[test]
    fn test_top_level_sees_nested_publishes() {
        let hub = Hub::new();
        let (_, count) = counter(&hub, "x");

        hub.publish_path("x");
        hub.publish_path("x:y");
        hub.publish_path("x:y:z");
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_nested_ignores_shallower_publishes() {
        let hub = Hub::new();
        let (_, count) = counter(&hub, "x:y:z");

        hub.publish_path("x");
        hub.publish_path("x:y");
        assert_eq!(count.load(Ordering::SeqCst), 0);
        hub.publish_path("x:y:z");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_try_subscribe_resolution() {
        let hub = Hub::new();
        let object = handler_fn(|_| Outcome::Failure).into_shared();
        let block = handler_fn(|_| ()).into_shared();

        hub.try_subscribe("a", Some(object), Some(block.clone()))
            .unwrap();
        assert!(!hub.publish_path("a"));

        hub.try_subscribe("b", None, Some(block)).unwrap();
        assert!(hub.publish_path("b"));

        let err = hub.try_subscribe("c", None, None).unwrap_err();
        assert_eq!(
            err,
            SubscribeError::InvalidHandler {
                path: "c".to_owned()
            }
        );
        assert_eq!(hub.subscription_count(), 2);
    }

    #[test]
    fn test_unsubscribe_returns_handle() {
        let hub = Hub::new();
        let (sub, count) = counter(&hub, "test");

        assert_eq!(hub.unsubscribe(sub.clone()), Some(sub.clone()));
        hub.publish_path("test");
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // Already gone: still hands the handle back.
        assert_eq!(hub.unsubscribe(sub.clone()), Some(sub));
        assert_eq!(hub.unsubscribe(None::<Subscription>), None);
    }

    #[test]
    fn test_unsubscribe_leaves_others() {
        let hub = Hub::new();
        let (first, first_count) = counter(&hub, "a");
        let (_, second_count) = counter(&hub, "a");
        let (_, nested_count) = counter(&hub, "a:b");

        hub.unsubscribe(first);
        hub.publish_path("a:b");

        assert_eq!(first_count.load(Ordering::SeqCst), 0);
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
        assert_eq!(nested_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_from_other_hub_is_noop() {
        let hub = Hub::new();
        let other = Hub::new();
        let (sub, _) = counter(&other, "deep:path");

        assert_eq!(hub.unsubscribe(sub.clone()), Some(sub));
        assert_eq!(hub.node_count(), 1);
        assert_eq!(other.subscription_count(), 1);
    }

    #[test]
    fn test_prune_on_unsubscribe() {
        let hub = Hub::builder().prune_empty_nodes(true).build();
        let (sub, _) = counter(&hub, "a:b:c");
        assert_eq!(hub.node_count(), 4);

        hub.unsubscribe(sub);
        assert_eq!(hub.node_count(), 1);
    }

    #[test]
    fn test_no_prune_by_default() {
        let hub = Hub::new();
        let (sub, _) = counter(&hub, "a:b:c");
        hub.unsubscribe(sub);
        assert_eq!(hub.node_count(), 4);
    }

    #[test]
    fn test_path_keys_reach_every_level() {
        let hub = Hub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for path in ["hello", "hello:world"] {
            let seen = seen.clone();
            hub.subscribe_fn(path, move |d| {
                seen.lock().push(d.get("model_name").cloned());
            });
        }

        let ctx = Context::new().with_path_keys([None, Some("model_name")]);
        assert!(hub.publish("hello:world", ctx));
        assert_eq!(
            *seen.lock(),
            vec![Some(json!("world")), Some(json!("world"))]
        );
    }

    #[test]
    fn test_path_keys_not_delivered() {
        let hub = Hub::new();
        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        hub.subscribe_fn("a", move |d| {
            *s.lock() = Some(d.fields().contains_key(topiary_core::PATH_KEYS));
        });

        hub.publish("a", Context::new().with_path_keys([Some("x")]));
        assert_eq!(*seen.lock(), Some(false));
    }

    #[test]
    fn test_root_subscription_sees_everything() {
        let hub = Hub::new();
        let (_, count) = counter(&hub, "");
        hub.publish_path("a");
        hub.publish_path("b:c");
        hub.publish_path("");
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_handler_may_reenter_hub() {
        let hub = Arc::new(Hub::new());
        let (_, count) = counter(&hub, "late");

        let inner = Arc::downgrade(&hub);
        hub.subscribe_fn("trigger", move |_| {
            if let Some(hub) = inner.upgrade() {
                hub.subscribe_fn("late:added", |_| ());
                hub.publish_path("late");
            }
        });

        assert!(hub.publish_path("trigger"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(hub.subscription_count(), 3);
    }

    #[test]
    fn test_set_primary_reports_transition() {
        let hub = Hub::new();
        assert!(!hub.is_primary());
        assert!(hub.set_primary(true));
        assert!(!hub.set_primary(true));
        assert!(hub.is_primary());
        assert!(!hub.set_primary(false));
        assert!(!hub.is_primary());
    }

    #[test]
    fn test_struct_handler() {
        struct Reject;
        impl Handler for Reject {
            fn call(&self, _delivery: &Delivery<'_>) -> Outcome {
                Outcome::Failure
            }
        }

        let hub = Hub::new();
        hub.subscribe("r", Reject);
        assert!(!hub.publish_path("r:s"));
        assert!(hub.publish_path("other"));
    }
}
