//! Link-time handler registration.
//!
//! Handlers can be declared next to the code they belong to and collected
//! into a hub later. Each declaration is a [`TopicRegistration`] submitted
//! to `inventory`, either by hand or through the `#[topic]` attribute.
//!
//! ```rust,ignore
//! fn audit(delivery: &Delivery<'_>) -> bool { true }
//!
//! inventory::submit! {
//!     TopicRegistration::new("orders:created", &audit_handler, "audit")
//! }
//!
//! let hub = Hub::builder().collect_registered().build();
//! ```

use crate::{hub::Hub, subscription::Subscription};
use std::fmt;
use topiary_core::{Delivery, Handler, Outcome};

/// A handler declared for a topic path.
///
/// This struct is submitted to `inventory` for automatic collection.
pub struct TopicRegistration {
    /// Topic path the handler subscribes to.
    pub path: &'static str,
    /// The handler.
    pub handler: &'static dyn Handler,
    /// Name used in log events.
    pub name: &'static str,
}

impl TopicRegistration {
    /// Declare `handler` for `path`.
    pub const fn new(path: &'static str, handler: &'static dyn Handler, name: &'static str) -> Self {
        Self {
            path,
            handler,
            name,
        }
    }
}

impl fmt::Debug for TopicRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicRegistration")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

inventory::collect!(TopicRegistration);

/// Every registration linked into the binary, in no particular order.
pub fn registrations() -> impl Iterator<Item = &'static TopicRegistration> {
    inventory::iter::<TopicRegistration>.into_iter()
}

/// Number of registrations for `path`.
pub fn registration_count(path: &str) -> usize {
    registrations().filter(|reg| reg.path == path).count()
}

struct Registered(&'static dyn Handler);

impl Handler for Registered {
    fn call(&self, delivery: &Delivery<'_>) -> Outcome {
        self.0.call(delivery)
    }
}

/// Subscribe every registration to `hub`.
///
/// Collection order is not defined by `inventory`, so registrations are
/// subscribed sorted by path and then by name.
pub fn subscribe_registered(hub: &Hub) -> Vec<Subscription> {
    let mut all: Vec<_> = registrations().collect();
    all.sort_by(|a, b| (a.path, a.name).cmp(&(b.path, b.name)));

    all.into_iter()
        .map(|reg| {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                hub = %hub.config().name,
                path = reg.path,
                handler = reg.name,
                "Subscribing registered handler"
            );
            hub.subscribe(reg.path, Registered(reg.handler))
        })
        .collect()
}
