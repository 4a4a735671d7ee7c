//! Subscription handles.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use topiary_core::{Delivery, Outcome, SharedHandler, TopicPath};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique subscription identifier, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Inner {
    id: SubscriptionId,
    path: TopicPath,
    handler: SharedHandler,
}

/// A handler registered at a topic path.
///
/// Returned by `subscribe` and passed back to `unsubscribe`. Cloning is
/// cheap and yields the *same* subscription: equality is identity, never
/// path equality, so two subscriptions at the same path with the same
/// handler are still distinct.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<Inner>,
}

impl Subscription {
    /// Pair a path with a handler.
    pub fn new(path: impl Into<TopicPath>, handler: SharedHandler) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: SubscriptionId::next(),
                path: path.into(),
                handler,
            }),
        }
    }

    /// The identifier.
    pub fn id(&self) -> SubscriptionId {
        self.inner.id
    }

    /// The path this subscription was registered at.
    pub fn path(&self) -> &TopicPath {
        &self.inner.path
    }

    /// The segments of [`Self::path`]; these locate the owning trie node.
    pub fn segments(&self) -> &[String] {
        self.inner.path.segments()
    }

    /// The handler.
    pub fn handler(&self) -> &SharedHandler {
        &self.inner.handler
    }

    /// Invoke the handler.
    pub fn call(&self, delivery: &Delivery<'_>) -> Outcome {
        self.inner.handler.call(delivery)
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Subscription {}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.inner.id)
            .field("path", &self.inner.path.as_str())
            .finish_non_exhaustive()
    }
}
