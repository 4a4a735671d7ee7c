//! Testing utilities for Topiary.
//!
//! This module provides handlers that make it easy to assert on what a hub
//! delivered.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records an owned [`Context`] for every delivery
//! - [`CountingHandler`]: counts invocations

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use topiary_core::{Context, Delivery, Handler, Outcome};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records every delivery it receives.
///
/// Each recorded entry is [`Delivery::to_context`], so `path_parts` and
/// `full_path` can be asserted on alongside the publisher's fields.
///
/// # Example
///
/// ```rust
/// use topiary_core::Context;
/// use topiary_std::{Hub, testing::RecordingHandler};
///
/// let hub = Hub::new();
/// let recorder = RecordingHandler::new();
/// hub.subscribe("hello", recorder.clone());
///
/// hub.publish("hello:world", Context::new());
///
/// let published = recorder.published();
/// assert_eq!(published.len(), 1);
/// assert_eq!(published[0].path_parts(), Some(vec!["world"]));
/// assert_eq!(published[0].full_path(), Some("hello:world"));
/// ```
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    published: Arc<Mutex<Vec<Context>>>,
    outcome: Outcome,
}

impl RecordingHandler {
    /// Create a new recording handler that succeeds.
    pub fn new() -> Self {
        Self::with_outcome(Outcome::Success)
    }

    /// Create a recording handler that reports a specific outcome.
    pub fn with_outcome(outcome: Outcome) -> Self {
        Self {
            published: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    /// Get a clone of the recorded contexts.
    pub fn published(&self) -> Vec<Context> {
        self.published.lock().clone()
    }

    /// The most recent recorded context.
    pub fn last(&self) -> Option<Context> {
        self.published.lock().last().cloned()
    }

    /// Get the number of recorded deliveries.
    pub fn times_called(&self) -> usize {
        self.published.lock().len()
    }

    /// Clear all recorded deliveries.
    pub fn clear(&self) {
        self.published.lock().clear();
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for RecordingHandler {
    fn call(&self, delivery: &Delivery<'_>) -> Outcome {
        self.published.lock().push(delivery.to_context());
        self.outcome
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
///
/// # Example
///
/// ```rust
/// use topiary_std::{Hub, testing::CountingHandler};
///
/// let hub = Hub::new();
/// let counter = CountingHandler::new();
/// hub.subscribe("x", counter.clone());
///
/// hub.publish_path("x:y");
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
    outcome: Outcome,
}

impl CountingHandler {
    /// Create a new counting handler that succeeds.
    pub fn new() -> Self {
        Self::with_outcome(Outcome::Success)
    }

    /// Create a counting handler that reports a specific outcome.
    pub fn with_outcome(outcome: Outcome) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            outcome,
        }
    }

    /// A counting handler that always fails.
    pub fn failing() -> Self {
        Self::with_outcome(Outcome::Failure)
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Default for CountingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for CountingHandler {
    fn call(&self, _delivery: &Delivery<'_>) -> Outcome {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::Hub;

    #[test]
    fn test_recording_handler_shares_state_across_clones() {
        let hub = Hub::new();
        let recorder = RecordingHandler::new();
        hub.subscribe("a", recorder.clone());

        hub.publish("a", Context::new().with("n", 1));
        hub.publish("a:b", Context::new().with("n", 2));

        assert_eq!(recorder.times_called(), 2);
        let last = recorder.last().unwrap();
        assert_eq!(last.path_parts(), Some(vec!["b"]));

        recorder.clear();
        assert_eq!(recorder.times_called(), 0);
    }

    #[test]
    fn test_counting_handler_outcome() {
        let hub = Hub::new();
        let counter = CountingHandler::failing();
        hub.subscribe("a", counter.clone());

        assert!(!hub.publish_path("a"));
        assert_eq!(counter.count(), 1);
        counter.reset();
        assert_eq!(counter.count(), 0);
    }
}
