//! Collaborator traits the compiler consults for named references.
//!
//! Implementations answer from whatever owns the broker configuration; the
//! compiler only reads. [`InMemoryRegistry`](crate::infra::memory::InMemoryRegistry)
//! is the bundled implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::model::CredentialReference;

/// Transport configuration a connector name resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectorConfig {
    /// Connector factory class name.
    pub factory_class_name: String,
    /// Transport parameters, rendered in key order.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl ConnectorConfig {
    /// Create a connector configuration without parameters.
    pub fn new(factory_class_name: impl Into<String>) -> Self {
        Self {
            factory_class_name: factory_class_name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Set a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Broadcast mechanism backing a discovery group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum BroadcastConfig {
    /// UDP multicast.
    #[serde(rename_all = "kebab-case")]
    Udp {
        /// Multicast group address.
        group_address: String,
        /// Multicast group port.
        group_port: u16,
        /// Local address to bind to.
        #[serde(default)]
        local_bind_address: Option<String>,
    },
    /// Cluster command dispatcher (group-membership protocol).
    #[serde(rename_all = "kebab-case")]
    ClusterDispatcher {
        /// Cluster name used for broadcasting.
        cluster_name: String,
        /// Channel the cluster runs on.
        channel_name: String,
    },
}

/// Discovery group configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscoveryGroupConfig {
    /// Broadcast mechanism.
    pub broadcast: BroadcastConfig,
    /// Time to wait for the first broadcast, in milliseconds.
    #[serde(default = "default_initial_wait_timeout")]
    pub initial_wait_timeout_ms: i64,
    /// Broadcast refresh timeout, in milliseconds.
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_ms: i64,
}

const fn default_initial_wait_timeout() -> i64 {
    10_000
}

const fn default_refresh_timeout() -> i64 {
    10_000
}

impl DiscoveryGroupConfig {
    /// UDP discovery group with default timeouts.
    pub fn udp(group_address: impl Into<String>, group_port: u16) -> Self {
        Self {
            broadcast: BroadcastConfig::Udp {
                group_address: group_address.into(),
                group_port,
                local_bind_address: None,
            },
            initial_wait_timeout_ms: default_initial_wait_timeout(),
            refresh_timeout_ms: default_refresh_timeout(),
        }
    }

    /// Cluster dispatcher discovery group with default timeouts.
    pub fn cluster(cluster_name: impl Into<String>, channel_name: impl Into<String>) -> Self {
        Self {
            broadcast: BroadcastConfig::ClusterDispatcher {
                cluster_name: cluster_name.into(),
                channel_name: channel_name.into(),
            },
            initial_wait_timeout_ms: default_initial_wait_timeout(),
            refresh_timeout_ms: default_refresh_timeout(),
        }
    }

    /// Override both timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, initial_wait_ms: i64, refresh_ms: i64) -> Self {
        self.initial_wait_timeout_ms = initial_wait_ms;
        self.refresh_timeout_ms = refresh_ms;
        self
    }
}

/// Resolves connector names to transport configurations.
pub trait ConnectorResolver {
    /// Resolve one connector.
    fn resolve_connector(&self, name: &str) -> Option<ConnectorConfig>;

    /// Names of all known connectors, in a stable order.
    fn connector_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Resolves discovery group names to broadcast configurations.
pub trait DiscoveryGroupResolver {
    /// Resolve one discovery group.
    fn resolve_discovery_group(&self, name: &str) -> Option<DiscoveryGroupConfig>;
}

/// Resolves credential references to clear-text secrets.
pub trait CredentialResolver {
    /// Resolve a reference held in a credential store.
    fn resolve_credential(&self, reference: &CredentialReference) -> Option<String>;
}

impl<T: ConnectorResolver + ?Sized> ConnectorResolver for &T {
    fn resolve_connector(&self, name: &str) -> Option<ConnectorConfig> {
        (**self).resolve_connector(name)
    }

    fn connector_names(&self) -> Vec<String> {
        (**self).connector_names()
    }
}

impl<T: DiscoveryGroupResolver + ?Sized> DiscoveryGroupResolver for &T {
    fn resolve_discovery_group(&self, name: &str) -> Option<DiscoveryGroupConfig> {
        (**self).resolve_discovery_group(name)
    }
}

impl<T: CredentialResolver + ?Sized> CredentialResolver for &T {
    fn resolve_credential(&self, reference: &CredentialReference) -> Option<String> {
        (**self).resolve_credential(reference)
    }
}

impl<T: ConnectorResolver + ?Sized> ConnectorResolver for std::sync::Arc<T> {
    fn resolve_connector(&self, name: &str) -> Option<ConnectorConfig> {
        (**self).resolve_connector(name)
    }

    fn connector_names(&self) -> Vec<String> {
        (**self).connector_names()
    }
}

impl<T: DiscoveryGroupResolver + ?Sized> DiscoveryGroupResolver for std::sync::Arc<T> {
    fn resolve_discovery_group(&self, name: &str) -> Option<DiscoveryGroupConfig> {
        (**self).resolve_discovery_group(name)
    }
}

impl<T: CredentialResolver + ?Sized> CredentialResolver for std::sync::Arc<T> {
    fn resolve_credential(&self, reference: &CredentialReference) -> Option<String> {
        (**self).resolve_credential(reference)
    }
}
