//! # Handlers
//!
//! A handler is anything that can be invoked with one [`Delivery`]. Both
//! closures and structs qualify:
//!
//! 1. **Closure**: `|delivery: &Delivery<'_>| { ... }` returning any [`IntoOutcome`]
//! 2. **Struct implementation**: `impl Handler for MyHandler`
//!
//! Whether something is callable is checked by the compiler when it is
//! subscribed, never at call time.

use crate::{
    context::Delivery,
    outcome::{IntoOutcome, Outcome},
};
use std::sync::Arc;

/// A type-erased, shareable handler.
pub type SharedHandler = Arc<dyn Handler>;

/// A subscriber callback.
///
/// Handlers run synchronously on the publishing thread and must not block
/// for long. The returned [`Outcome`] only affects the boolean `publish`
/// reports; it never stops other handlers from running.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a topic handler",
    label = "missing `Handler` implementation",
    note = "Implement `Handler` or pass a closure taking `&Delivery<'_>`."
)]
pub trait Handler: Send + Sync + 'static {
    /// Handle one delivery.
    fn call(&self, delivery: &Delivery<'_>) -> Outcome;

    /// Only run this handler for deliveries accepted by `predicate`.
    ///
    /// Rejected deliveries count as success.
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: Fn(&Delivery<'_>) -> bool + Send + Sync + 'static,
    {
        Filter {
            handler: self,
            predicate,
        }
    }

    /// Erase the concrete type.
    fn into_shared(self) -> SharedHandler
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

// Blanket impl for closures
impl<F, R> Handler for F
where
    F: Fn(&Delivery<'_>) -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    fn call(&self, delivery: &Delivery<'_>) -> Outcome {
        (self)(delivery).into_outcome()
    }
}

/// Pin a closure's signature so it is accepted as a [`Handler`].
///
/// Closures passed straight to a generic `H: Handler` parameter cannot have
/// their argument type inferred; wrapping them here fixes it.
///
/// ```rust
/// use topiary_core::{handler_fn, Handler};
///
/// let handler = handler_fn(|d| d.path_parts().is_empty());
/// let shared = handler.into_shared();
/// # let _ = shared;
/// ```
pub fn handler_fn<F, R>(f: F) -> F
where
    F: Fn(&Delivery<'_>) -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    f
}

/// Handler wrapper returned by [`Handler::filter`].
pub struct Filter<H, P> {
    handler: H,
    predicate: P,
}

impl<H, P> Handler for Filter<H, P>
where
    H: Handler,
    P: Fn(&Delivery<'_>) -> bool + Send + Sync + 'static,
{
    fn call(&self, delivery: &Delivery<'_>) -> Outcome {
        if (self.predicate)(delivery) {
            self.handler.call(delivery)
        } else {
            Outcome::Success
        }
    }
}
