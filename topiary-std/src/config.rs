//! Hub configuration.

use crate::hub::Hub;
use std::borrow::Cow;

/// Settings for a [`Hub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Drop trie nodes left without subscriptions or children on
    /// `unsubscribe`. Off by default.
    pub prune_empty_nodes: bool,
    /// Name attached to log events.
    pub name: Cow<'static, str>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            prune_empty_nodes: false,
            name: Cow::Borrowed("hub"),
        }
    }
}

/// Builder for constructing a [`Hub`].
///
/// # Example
///
/// ```rust
/// use topiary_std::Hub;
///
/// let hub = Hub::builder().name("orders").prune_empty_nodes(true).build();
/// assert_eq!(hub.config().name, "orders");
/// ```
#[derive(Debug, Default)]
pub struct HubBuilder {
    config: HubConfig,
    #[cfg(feature = "inventory")]
    collect_registered: bool,
}

impl HubBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Enable or disable pruning of empty trie nodes.
    pub fn prune_empty_nodes(mut self, enabled: bool) -> Self {
        self.config.prune_empty_nodes = enabled;
        self
    }

    /// Set the name used in log events.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Subscribe every handler submitted through
    /// [`TopicRegistration`](crate::registration::TopicRegistration) when
    /// the hub is built.
    #[cfg(feature = "inventory")]
    pub fn collect_registered(mut self) -> Self {
        self.collect_registered = true;
        self
    }

    /// Build the hub.
    pub fn build(self) -> Hub {
        let hub = Hub::with_config(self.config);

        #[cfg(feature = "inventory")]
        if self.collect_registered {
            crate::registration::subscribe_registered(&hub);
        }

        hub
    }
}
