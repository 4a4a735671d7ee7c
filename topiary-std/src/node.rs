//! Segment-keyed topic trie.
//!
//! Each [`TopicNode`] holds the subscriptions registered exactly at its
//! depth and a child per next segment. Publishing to `a:b:c` walks
//! `root → a → b → c`, notifying every node on the way; nodes deeper than
//! the published path are never visited.
//!
//! # Example
//!
//! ```rust
//! use topiary_core::{handler_fn, Context, Handler, split_segments};
//! use topiary_std::{Subscription, TopicNode};
//!
//! let mut root = TopicNode::new();
//! let sub = Subscription::new("order", handler_fn(|_| ()).into_shared());
//! root.sublevel_at(sub.segments()).add(sub);
//!
//! let segments = split_segments("order:created");
//! assert!(root.dispatch(&segments, "order:created", &Context::new()));
//! ```

use crate::subscription::Subscription;
use std::collections::HashMap;
use topiary_core::{Context, Delivery, Outcome};

/// A node in the topic trie.
#[derive(Debug, Default)]
pub struct TopicNode {
    /// Subscriptions registered at this exact depth, in insertion order.
    subscriptions: Vec<Subscription>,
    /// Children nodes, keyed by segment.
    children: HashMap<String, TopicNode>,
}

impl TopicNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `segments` from this node, creating missing nodes.
    ///
    /// Returns this node itself for an empty sequence.
    pub fn sublevel_at<S: AsRef<str>>(&mut self, segments: &[S]) -> &mut TopicNode {
        let mut node = self;
        for segment in segments {
            node = node.children.entry(segment.as_ref().to_owned()).or_default();
        }
        node
    }

    /// Walk `segments` without creating nodes.
    pub fn sublevel<S: AsRef<str>>(&self, segments: &[S]) -> Option<&TopicNode> {
        let mut node = self;
        for segment in segments {
            node = node.children.get(segment.as_ref())?;
        }
        Some(node)
    }

    /// Mutable variant of [`Self::sublevel`].
    pub fn sublevel_mut<S: AsRef<str>>(&mut self, segments: &[S]) -> Option<&mut TopicNode> {
        let mut node = self;
        for segment in segments {
            node = node.children.get_mut(segment.as_ref())?;
        }
        Some(node)
    }

    /// Register a subscription at this node.
    ///
    /// The caller is responsible for picking the node matching the
    /// subscription's segments.
    pub fn add(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Remove a subscription by identity.
    ///
    /// Returns whether it was present; removing an absent subscription is a
    /// no-op.
    pub fn remove(&mut self, subscription: &Subscription) -> bool {
        match self.subscriptions.iter().position(|s| s == subscription) {
            Some(idx) => {
                self.subscriptions.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Subscriptions registered at this node.
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Child node for one segment.
    pub fn child(&self, segment: &str) -> Option<&TopicNode> {
        self.children.get(segment)
    }

    /// Number of subscriptions at this node.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether this node has no subscriptions of its own.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Whether this node has neither subscriptions nor children.
    pub fn is_vacant(&self) -> bool {
        self.subscriptions.is_empty() && self.children.is_empty()
    }

    /// Number of subscriptions in this subtree.
    pub fn total_subscriptions(&self) -> usize {
        self.subscriptions.len()
            + self
                .children
                .values()
                .map(TopicNode::total_subscriptions)
                .sum::<usize>()
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .values()
            .map(TopicNode::node_count)
            .sum::<usize>()
    }

    /// Remove vacant nodes along `segments`, deepest first.
    ///
    /// Stops at the first node that still holds subscriptions or other
    /// children. Returns whether this node is vacant afterwards; the caller
    /// decides whether to drop it.
    pub fn prune<S: AsRef<str>>(&mut self, segments: &[S]) -> bool {
        if let Some((head, tail)) = segments.split_first() {
            let head = head.as_ref();
            if let Some(child) = self.children.get_mut(head) {
                if child.prune(tail) {
                    self.children.remove(head);
                }
            }
        }
        self.is_vacant()
    }

    /// Collect the ancestor-or-self chain for `remaining`.
    ///
    /// The route holds clones of the matched subscription lists, so it stays
    /// valid after the trie is modified.
    pub fn route<'p>(&self, remaining: &'p [String]) -> Route<'p> {
        let mut route = Route { stages: Vec::new() };
        self.collect(remaining, &mut route.stages);
        route
    }

    fn collect<'p>(&self, remaining: &'p [String], stages: &mut Vec<Stage<'p>>) {
        stages.push(Stage {
            remaining,
            subscriptions: self.subscriptions.clone(),
        });

        if let Some((head, tail)) = remaining.split_first() {
            if let Some(child) = self.children.get(head) {
                child.collect(tail, stages);
            }
        }
    }

    /// Notify this node and every descendant along `remaining`.
    ///
    /// Handlers at this node see `path_parts == remaining`. Returns `false`
    /// if any invoked handler failed; every handler runs regardless.
    pub fn dispatch(&self, remaining: &[String], full_path: &str, context: &Context) -> bool {
        self.route(remaining).deliver(full_path, context)
    }
}

/// One visited node of a [`Route`].
#[derive(Debug, Clone)]
struct Stage<'p> {
    /// Segments not consumed to reach the node.
    remaining: &'p [String],
    subscriptions: Vec<Subscription>,
}

/// The matched ancestor-or-self chain of a publish, root first.
#[derive(Debug, Clone)]
pub struct Route<'p> {
    stages: Vec<Stage<'p>>,
}

impl<'p> Route<'p> {
    /// Number of visited nodes, the root included.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }

    /// Number of subscriptions that will be invoked.
    pub fn handler_count(&self) -> usize {
        self.stages.iter().map(|s| s.subscriptions.len()).sum()
    }

    /// Matched subscriptions, root first, each in insertion order.
    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.stages.iter().flat_map(|s| s.subscriptions.iter())
    }

    /// Invoke every matched handler in order.
    ///
    /// Returns `false` if any handler failed.
    pub fn deliver(&self, full_path: &str, context: &Context) -> bool {
        let mut outcome = Outcome::Success;

        for stage in &self.stages {
            let delivery = Delivery::new(context, stage.remaining, full_path);
            for subscription in &stage.subscriptions {
                let result = subscription.call(&delivery);

                #[cfg(feature = "tracing")]
                if result.is_failure() {
                    tracing::debug!(
                        subscription = %subscription.id(),
                        path = %subscription.path(),
                        full_path = %full_path,
                        "Handler reported failure"
                    );
                }

                outcome = outcome.and(result);
            }
        }

        outcome.is_success()
    }
}
