//! In-memory registry answering connector, discovery group and credential
//! lookups.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::config::{CredentialStoreConfig, SubsystemConfig};
use crate::core::model::CredentialReference;
use crate::core::resolver::{
    ConnectorConfig, ConnectorResolver, CredentialResolver, DiscoveryGroupConfig,
    DiscoveryGroupResolver,
};

/// Broker registry backed by `parking_lot::RwLock` maps.
///
/// Reads take shared locks, so one registry can serve many compilers at once
/// while definitions are added at runtime.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    connectors: RwLock<BTreeMap<String, ConnectorConfig>>,
    discovery_groups: RwLock<BTreeMap<String, DiscoveryGroupConfig>>,
    credential_stores: RwLock<BTreeMap<String, CredentialStoreConfig>>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry from a configuration document.
    #[must_use]
    pub fn from_config(cfg: &SubsystemConfig) -> Self {
        Self {
            connectors: RwLock::new(cfg.connectors.clone()),
            discovery_groups: RwLock::new(cfg.discovery_groups.clone()),
            credential_stores: RwLock::new(cfg.credential_stores.clone()),
        }
    }

    /// Add or replace a connector.
    pub fn register_connector(&self, name: impl Into<String>, config: ConnectorConfig) {
        self.connectors.write().insert(name.into(), config);
    }

    /// Add or replace a discovery group.
    pub fn register_discovery_group(&self, name: impl Into<String>, config: DiscoveryGroupConfig) {
        self.discovery_groups.write().insert(name.into(), config);
    }

    /// Add or replace a secret in a credential store, creating the store if needed.
    pub fn register_credential(
        &self,
        store: impl Into<String>,
        alias: impl Into<String>,
        secret: impl Into<String>,
    ) {
        self.credential_stores
            .write()
            .entry(store.into())
            .or_default()
            .insert(alias.into(), secret.into());
    }

    /// Remove a connector, returning its configuration.
    pub fn remove_connector(&self, name: &str) -> Option<ConnectorConfig> {
        self.connectors.write().remove(name)
    }
}

impl ConnectorResolver for InMemoryRegistry {
    fn resolve_connector(&self, name: &str) -> Option<ConnectorConfig> {
        self.connectors.read().get(name).cloned()
    }

    fn connector_names(&self) -> Vec<String> {
        self.connectors.read().keys().cloned().collect()
    }
}

impl DiscoveryGroupResolver for InMemoryRegistry {
    fn resolve_discovery_group(&self, name: &str) -> Option<DiscoveryGroupConfig> {
        self.discovery_groups.read().get(name).cloned()
    }
}

impl CredentialResolver for InMemoryRegistry {
    fn resolve_credential(&self, reference: &CredentialReference) -> Option<String> {
        match (&reference.store, &reference.alias) {
            (Some(store), Some(alias)) => self
                .credential_stores
                .read()
                .get(store)
                .and_then(|secrets| secrets.get(alias))
                .cloned(),
            (None, _) => reference.clear_text.clone(),
            (Some(_), None) => None,
        }
    }
}
