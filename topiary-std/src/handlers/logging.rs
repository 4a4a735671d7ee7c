//! Logging Handler - Observability for topic traffic.

use topiary_core::{Delivery, Handler, Outcome};

/// A handler that logs every delivery it receives and succeeds.
///
/// Subscribe it at the root (`""`) to trace all traffic through a hub, or
/// at a prefix to trace one subtree. Log events are emitted through
/// `tracing` at debug level when the `tracing` feature is enabled.
///
/// # Example
///
/// ```rust,ignore
/// use topiary::{Hub, handlers::LoggingHandler};
///
/// let hub = Hub::new();
/// hub.subscribe("", LoggingHandler::new());
/// hub.subscribe("order", LoggingHandler::named("orders"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingHandler {
    name: &'static str,
}

impl LoggingHandler {
    /// Create a new `LoggingHandler` with a default name.
    pub fn new() -> Self {
        Self { name: "topic" }
    }

    /// Create a new `LoggingHandler` with a custom name.
    ///
    /// The name is used in log messages to identify the subscriber.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name used in log messages.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LoggingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for LoggingHandler {
    fn call(&self, delivery: &Delivery<'_>) -> Outcome {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                name = %self.name,
                full_path = %delivery.full_path(),
                path_parts = ?delivery.path_parts(),
                fields = delivery.fields().len(),
                "Received delivery"
            );
        }

        #[cfg(not(feature = "tracing"))]
        {
            let _ = (self.name, delivery);
        }

        Outcome::Success
    }
}
