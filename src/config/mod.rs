//! Configuration models for connectors, discovery groups and factories.

pub mod subsystem;

pub use subsystem::{CredentialStoreConfig, PooledFactoryConfig, SubsystemConfig, CONFIG_ENV_VAR};
