//! # Default hub registry
//!
//! Applications are encouraged to construct a [`Hub`] and pass it around.
//! For code that cannot, a [`HubRegistry`] holds a *default* hub:
//!
//! - [`HubRegistry::current`] returns the default, creating it on first use,
//! - [`HubRegistry::replace`] swaps it for another hub (or resets it),
//! - [`HubRegistry::on_load`] registers observers that run whenever a hub
//!   becomes the default.
//!
//! The hub held by a registry is *primary* ([`Hub::is_primary`]); replacing
//! it clears the flag on the old hub. Observers run once per `false → true`
//! transition, outside any registry lock, so they may use the registry.
//!
//! One process-wide registry is available through [`global`] and the free
//! functions of this module. It is initialised on first use.

use crate::{hub::Hub, subscription::Subscription};
use lazy_static::lazy_static;
use parking_lot::{Mutex, RwLock};
use std::{fmt, sync::Arc};
use topiary_core::{Context, Delivery, Handler, IntoOutcome};

/// Observer run when a hub becomes the default.
pub type LoadHook = Arc<dyn Fn(&Arc<Hub>) + Send + Sync>;

/// Holder of a default [`Hub`].
#[derive(Default)]
pub struct HubRegistry {
    current: RwLock<Option<Arc<Hub>>>,
    hooks: Mutex<Vec<LoadHook>>,
}

impl HubRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default hub, created (and marked primary) on first use.
    pub fn current(&self) -> Arc<Hub> {
        if let Some(hub) = self.current.read().as_ref() {
            return hub.clone();
        }

        let (hub, hooks) = {
            let mut slot = self.current.write();
            if let Some(hub) = slot.as_ref() {
                return hub.clone();
            }
            let hub = Arc::new(Hub::new());
            hub.set_primary(true);
            *slot = Some(hub.clone());
            (hub, self.hooks.lock().clone())
        };

        self.run_hooks(&hub, hooks);
        hub
    }

    /// The default hub, if one exists. Never creates one.
    pub fn peek(&self) -> Option<Arc<Hub>> {
        self.current.read().clone()
    }

    /// Make `hub` the default, returning the previous one.
    ///
    /// The previous hub loses its primary flag and `hub` gains it; load
    /// hooks run if `hub` was not primary yet. Passing `None` clears the
    /// slot, so the next [`Self::current`] creates a fresh hub. Replacing a
    /// hub with itself changes nothing.
    ///
    /// Flags change while the slot is locked, so concurrent replacements
    /// always leave exactly the stored hub primary. Hooks run after the lock
    /// is released, with the hook list as it was at the transition.
    pub fn replace(&self, hub: Option<Arc<Hub>>) -> Option<Arc<Hub>> {
        let (previous, hooks) = {
            let mut slot = self.current.write();
            let previous = std::mem::replace(&mut *slot, hub.clone());

            let unchanged = match (&previous, &hub) {
                (Some(old), Some(new)) => Arc::ptr_eq(old, new),
                (None, None) => true,
                _ => false,
            };
            if unchanged {
                return previous;
            }

            if let Some(old) = &previous {
                old.set_primary(false);
            }
            let hooks = match &hub {
                Some(new) if new.set_primary(true) => Some(self.hooks.lock().clone()),
                _ => None,
            };
            (previous, hooks)
        };

        if let (Some(new), Some(hooks)) = (&hub, hooks) {
            self.run_hooks(new, hooks);
        }

        previous
    }

    /// Register an observer for hubs becoming the default.
    ///
    /// If a default hub already exists the observer runs immediately
    /// against it. Either way it runs once per transition.
    pub fn on_load<F>(&self, hook: F)
    where
        F: Fn(&Arc<Hub>) + Send + Sync + 'static,
    {
        let hook: LoadHook = Arc::new(hook);

        // Holding the slot keeps transitions out until the hook is listed.
        let existing = {
            let slot = self.current.read();
            self.hooks.lock().push(hook.clone());
            slot.clone()
        };

        if let Some(hub) = existing {
            hook(&hub);
        }
    }

    fn run_hooks(&self, hub: &Arc<Hub>, hooks: Vec<LoadHook>) {
        #[cfg(feature = "tracing")]
        tracing::info!(
            hub = %hub.config().name,
            hooks = hooks.len(),
            "Hub became the default"
        );

        for hook in hooks {
            hook(hub);
        }
    }

    /// [`Hub::subscribe`] on the default hub.
    pub fn subscribe<H: Handler>(&self, path: &str, handler: H) -> Subscription {
        self.current().subscribe(path, handler)
    }

    /// [`Hub::subscribe_fn`] on the default hub.
    pub fn subscribe_fn<F, R>(&self, path: &str, handler: F) -> Subscription
    where
        F: Fn(&Delivery<'_>) -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        self.current().subscribe_fn(path, handler)
    }

    /// [`Hub::unsubscribe`] on the default hub.
    pub fn unsubscribe(
        &self,
        subscription: impl Into<Option<Subscription>>,
    ) -> Option<Subscription> {
        self.current().unsubscribe(subscription)
    }

    /// [`Hub::publish`] on the default hub.
    pub fn publish(&self, path: &str, context: Context) -> bool {
        self.current().publish(path, context)
    }
}

impl fmt::Debug for HubRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubRegistry")
            .field("current", &*self.current.read())
            .field("hooks", &self.hooks.lock().len())
            .finish()
    }
}

lazy_static! {
    static ref GLOBAL: HubRegistry = HubRegistry::new();
}

/// The process-wide registry.
pub fn global() -> &'static HubRegistry {
    &GLOBAL
}

/// The process-wide default hub.
pub fn default_hub() -> Arc<Hub> {
    global().current()
}

/// Replace the process-wide default hub. See [`HubRegistry::replace`].
pub fn set_default_hub(hub: Option<Arc<Hub>>) -> Option<Arc<Hub>> {
    global().replace(hub)
}

/// Observe the process-wide default hub. See [`HubRegistry::on_load`].
pub fn on_load<F>(hook: F)
where
    F: Fn(&Arc<Hub>) + Send + Sync + 'static,
{
    global().on_load(hook)
}

/// Subscribe on the process-wide default hub.
pub fn subscribe<H: Handler>(path: &str, handler: H) -> Subscription {
    global().subscribe(path, handler)
}

/// Subscribe a closure on the process-wide default hub.
pub fn subscribe_fn<F, R>(path: &str, handler: F) -> Subscription
where
    F: Fn(&Delivery<'_>) -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    global().subscribe_fn(path, handler)
}

/// Unsubscribe from the process-wide default hub.
pub fn unsubscribe(subscription: impl Into<Option<Subscription>>) -> Option<Subscription> {
    global().unsubscribe(subscription)
}

/// Publish on the process-wide default hub.
pub fn publish(path: &str, context: Context) -> bool {
    global().publish(path, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_hook(registry: &HubRegistry) -> (Arc<AtomicUsize>, Arc<Mutex<Option<Arc<Hub>>>>) {
        let called = Arc::new(AtomicUsize::new(0));
        let found = Arc::new(Mutex::new(None));
        let (c, f) = (called.clone(), found.clone());
        registry.on_load(move |hub| {
            c.fetch_add(1, Ordering::SeqCst);
            *f.lock() = Some(hub.clone());
        });
        (called, found)
    }

    #[test]
    fn test_fresh_hub_is_not_primary() {
        let registry = HubRegistry::new();
        let hub = Arc::new(Hub::new());
        assert!(!hub.is_primary());

        let default = registry.current();
        assert!(!Arc::ptr_eq(&default, &hub));
        assert!(default.is_primary());
    }

    #[test]
    fn test_current_is_stable() {
        let registry = HubRegistry::new();
        assert!(registry.peek().is_none());
        let a = registry.current();
        let b = registry.current();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_load_hook_runs_on_replace() {
        let registry = HubRegistry::new();
        registry.current();
        let (called, found) = counting_hook(&registry);
        // Ran immediately against the existing default.
        assert_eq!(called.load(Ordering::SeqCst), 1);

        called.store(0, Ordering::SeqCst);
        let hub = Arc::new(Hub::new());
        registry.replace(Some(hub.clone()));

        assert_eq!(called.load(Ordering::SeqCst), 1);
        let found = found.lock().clone().unwrap();
        assert!(Arc::ptr_eq(&found, &hub));
    }

    #[test]
    fn test_load_hook_runs_on_lazy_creation() {
        let registry = HubRegistry::new();
        let (called, _) = counting_hook(&registry);
        assert_eq!(called.load(Ordering::SeqCst), 0);

        registry.current();
        registry.current();
        assert_eq!(called.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replace_moves_primary_flag() {
        let registry = HubRegistry::new();
        let old = registry.current();
        assert!(old.is_primary());

        let new = Arc::new(Hub::new());
        let previous = registry.replace(Some(new.clone())).unwrap();

        assert!(Arc::ptr_eq(&previous, &old));
        assert!(!old.is_primary());
        assert!(new.is_primary());
    }

    #[test]
    fn test_replace_with_same_hub_is_noop() {
        let registry = HubRegistry::new();
        let hub = registry.current();
        let (called, _) = counting_hook(&registry);
        called.store(0, Ordering::SeqCst);

        registry.replace(Some(hub.clone()));
        assert!(hub.is_primary());
        assert_eq!(called.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reset_creates_fresh_primary() {
        let registry = HubRegistry::new();
        let old = registry.current();
        registry.replace(None);

        assert!(!old.is_primary());
        assert!(registry.peek().is_none());
        let fresh = registry.current();
        assert!(fresh.is_primary());
        assert!(!Arc::ptr_eq(&old, &fresh));
    }

    #[test]
    fn test_hook_may_use_registry() {
        let registry = Arc::new(HubRegistry::new());
        let inner = Arc::downgrade(&registry);
        registry.on_load(move |_| {
            if let Some(registry) = inner.upgrade() {
                registry.subscribe_fn("loaded", |_| ());
            }
        });

        let hub = registry.current();
        assert_eq!(hub.subscription_count(), 1);
    }

    #[test]
    fn test_delegation() {
        let registry = HubRegistry::new();
        let called = Arc::new(AtomicUsize::new(0));
        let c = called.clone();
        let sub = registry.subscribe_fn("a", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.publish("a:b", Context::new()));
        assert_eq!(called.load(Ordering::SeqCst), 1);
        assert_eq!(registry.unsubscribe(sub.clone()), Some(sub));
        registry.publish("a", Context::new());
        assert_eq!(called.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_replace_leaves_single_primary() {
        for _ in 0..50 {
            let registry = Arc::new(HubRegistry::new());
            let hubs: Vec<_> = (0..8).map(|_| Arc::new(Hub::new())).collect();

            let threads: Vec<_> = hubs
                .iter()
                .cloned()
                .map(|hub| {
                    let registry = registry.clone();
                    std::thread::spawn(move || {
                        for _ in 0..20 {
                            registry.replace(Some(hub.clone()));
                            registry.current();
                        }
                    })
                })
                .collect();
            for thread in threads {
                thread.join().unwrap();
            }

            let default = registry.peek().unwrap();
            assert!(default.is_primary());
            let primaries = hubs.iter().filter(|hub| hub.is_primary()).count();
            assert_eq!(primaries, 1);
        }
    }

    #[test]
    fn test_concurrent_on_load_runs_once_per_transition() {
        for _ in 0..100 {
            let registry = Arc::new(HubRegistry::new());
            let called = Arc::new(AtomicUsize::new(0));

            let creator = {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry.current();
                })
            };
            let observer = {
                let registry = registry.clone();
                let called = called.clone();
                std::thread::spawn(move || {
                    registry.on_load(move |_| {
                        called.fetch_add(1, Ordering::SeqCst);
                    });
                })
            };
            creator.join().unwrap();
            observer.join().unwrap();

            assert_eq!(called.load(Ordering::SeqCst), 1);
        }
    }
}
