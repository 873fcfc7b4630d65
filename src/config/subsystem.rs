//! Subsystem configuration document: connectors, discovery groups,
//! credential stores and the pooled connection factories that use them.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::model::{ConnectionFactorySpec, CredentialReference, OptionValue};
use crate::core::resolver::{ConnectorConfig, DiscoveryGroupConfig};
use crate::core::schema::{
    AttributeSchema, ENLISTMENT_TRACE, MANAGED_CONNECTION_POOL, MAX_POOL_SIZE, MIN_POOL_SIZE,
    TRANSACTION,
};
use crate::core::AppResult;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "PCF_CONFIG";

/// Secrets held by one credential store, keyed by alias.
pub type CredentialStoreConfig = BTreeMap<String, String>;

/// One pooled connection factory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PooledFactoryConfig {
    /// JNDI names; the first is primary.
    #[serde(default)]
    pub entries: Vec<String>,
    /// Connector names.
    #[serde(default)]
    pub connectors: Vec<String>,
    /// Discovery group name.
    #[serde(default)]
    pub discovery_group: Option<String>,
    /// Credential reference replacing a plain password.
    #[serde(default)]
    pub credential_reference: Option<CredentialReference>,
    /// Use the first defined connector when no transport is set.
    #[serde(default)]
    pub pick_any_connector: bool,
    /// Remaining attributes, by schema name.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, OptionValue>,
}

impl PooledFactoryConfig {
    /// Validate against the pooled schema and the surrounding document.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first problem found.
    pub fn validate(&self, schema: &AttributeSchema, doc: &SubsystemConfig) -> Result<(), String> {
        if self.entries.is_empty() {
            return Err("at least one entry must be defined".into());
        }
        match (self.connectors.is_empty(), &self.discovery_group) {
            (false, Some(_)) => {
                return Err("connectors and discovery-group are mutually exclusive".into())
            }
            (true, None) if !self.pick_any_connector => {
                return Err("either connectors or discovery-group must be set".into())
            }
            _ => {}
        }
        for connector in &self.connectors {
            if !doc.connectors.contains_key(connector) {
                return Err(format!("unknown connector `{connector}`"));
            }
        }
        if let Some(group) = &self.discovery_group {
            if !doc.discovery_groups.contains_key(group) {
                return Err(format!("unknown discovery group `{group}`"));
            }
        }
        for (name, value) in &self.attributes {
            let attribute = schema
                .get(name)
                .ok_or_else(|| format!("unknown attribute `{name}`"))?;
            if !attribute.value_type.accepts(value) {
                return Err(format!(
                    "attribute `{name}` expects {:?}, got `{}`",
                    attribute.value_type,
                    value.render()
                ));
            }
        }
        Ok(())
    }

    /// Build the compiler input for this factory.
    ///
    /// Pool sizing, transaction mode, managed pool and enlistment tracing are
    /// lifted out of the attribute map; absent values take schema defaults.
    #[must_use]
    pub fn to_spec(&self, name: &str, schema: &AttributeSchema) -> ConnectionFactorySpec {
        let mut options = self.attributes.clone();
        let mut take = |key: &str| {
            options
                .remove(key)
                .or_else(|| schema.get(key).and_then(|a| a.default).map(|d| d.to_value()))
        };

        let min_pool_size = take(MIN_POOL_SIZE)
            .and_then(|v| v.as_i64())
            .and_then(|v| i32::try_from(v).ok());
        let max_pool_size = take(MAX_POOL_SIZE)
            .and_then(|v| v.as_i64())
            .and_then(|v| i32::try_from(v).ok());
        let transaction = take(TRANSACTION)
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_else(|| "xa".into());
        let managed_connection_pool = take(MANAGED_CONNECTION_POOL).and_then(|v| v.as_str().map(str::to_owned));
        let enlistment_trace = take(ENLISTMENT_TRACE).and_then(|v| v.as_bool());

        ConnectionFactorySpec {
            name: name.to_owned(),
            entries: self.entries.clone(),
            connectors: self.connectors.clone(),
            discovery_group: self.discovery_group.clone(),
            options,
            min_pool_size,
            max_pool_size,
            transaction,
            managed_connection_pool,
            enlistment_trace,
            credential_reference: self.credential_reference.clone(),
            pick_any_connector: self.pick_any_connector,
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubsystemConfig {
    /// Connectors by name.
    #[serde(default)]
    pub connectors: BTreeMap<String, ConnectorConfig>,
    /// Discovery groups by name.
    #[serde(default)]
    pub discovery_groups: BTreeMap<String, DiscoveryGroupConfig>,
    /// Credential stores by name.
    #[serde(default)]
    pub credential_stores: BTreeMap<String, CredentialStoreConfig>,
    /// Pooled connection factories by name.
    #[serde(default)]
    pub pooled_connection_factories: BTreeMap<String, PooledFactoryConfig>,
}

impl SubsystemConfig {
    /// Validate every factory and ensure at least one exists.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending factory.
    pub fn validate(&self) -> Result<(), String> {
        if self.pooled_connection_factories.is_empty() {
            return Err("at least one pooled connection factory must be defined".into());
        }
        let schema = AttributeSchema::pooled();
        for (name, factory) in &self.pooled_connection_factories {
            factory
                .validate(&schema, self)
                .map_err(|e| format!("pooled connection factory `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading {}", path.display()))
    }

    /// Load the file named by `PCF_CONFIG`, reading `.env` first if present.
    ///
    /// # Errors
    ///
    /// Fails when the variable is unset or the file is invalid.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_ENV_VAR).with_context(|| format!("{CONFIG_ENV_VAR} is not set"))?;
        Self::from_path(path)
    }

    /// Compiler inputs for every factory, in name order.
    #[must_use]
    pub fn specs(&self) -> Vec<ConnectionFactorySpec> {
        let schema = AttributeSchema::pooled();
        self.pooled_connection_factories
            .iter()
            .map(|(name, factory)| factory.to_spec(name, &schema))
            .collect()
    }
}
