#![allow(dead_code)]

use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use topiary::{Context, Delivery, Handler, Hub, Outcome, testing::RecordingHandler};

// ============================================================================
// Shared fixtures
// ============================================================================

lazy_static! {
    /// Serializes tests that touch the process-wide default hub.
    pub static ref DEFAULT_HUB_LOCK: Mutex<()> = Mutex::new(());
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Counts calls through a shared counter.
#[derive(Clone, Default)]
pub struct Tracker {
    pub called: Arc<AtomicUsize>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn called(&self) -> usize {
        self.called.load(Ordering::SeqCst)
    }
}

impl Handler for Tracker {
    fn call(&self, _delivery: &Delivery<'_>) -> Outcome {
        self.called.fetch_add(1, Ordering::SeqCst);
        Outcome::Success
    }
}

/// Records its id into a shared log, for ordering assertions.
pub struct OrderRecordingHandler {
    pub id: usize,
    pub order: Arc<Mutex<Vec<usize>>>,
    pub outcome: Outcome,
}

impl Handler for OrderRecordingHandler {
    fn call(&self, _delivery: &Delivery<'_>) -> Outcome {
        self.order.lock().push(self.id);
        self.outcome
    }
}

/// Recorders subscribed at `hello`, `hello:world`, `foo` and `foo:bar`.
pub struct Subscribers {
    pub top_level_a: RecordingHandler,
    pub nested_a: RecordingHandler,
    pub top_level_b: RecordingHandler,
    pub nested_b: RecordingHandler,
}

impl Subscribers {
    pub fn install(hub: &Hub) -> Self {
        let subscribers = Self {
            top_level_a: RecordingHandler::new(),
            nested_a: RecordingHandler::new(),
            top_level_b: RecordingHandler::new(),
            nested_b: RecordingHandler::new(),
        };
        hub.subscribe("hello", subscribers.top_level_a.clone());
        hub.subscribe("hello:world", subscribers.nested_a.clone());
        hub.subscribe("foo", subscribers.top_level_b.clone());
        hub.subscribe("foo:bar", subscribers.nested_b.clone());
        subscribers
    }
}

pub fn last(recorder: &RecordingHandler) -> Context {
    recorder.last().expect("handler was not called")
}
