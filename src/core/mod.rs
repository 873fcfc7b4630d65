//! Core compiler abstractions: schema, data model, resolvers and the facade.

pub mod error;
pub mod model;
pub mod schema;
pub mod resolver;
pub mod compiler;

pub use error::{AppResult, CompileError};
pub use model::{
    ConfigProperty, ConfigPropertyBag, ConfigPropertyType, ConnectionFactorySpec, CredentialReference,
    JndiBindings, OptionValue,
};
pub use schema::{Attribute, AttributeSchema, Direction, FactoryVariant, ValueType};
pub use resolver::{
    BroadcastConfig, ConnectorConfig, ConnectorResolver, CredentialResolver, DiscoveryGroupConfig,
    DiscoveryGroupResolver,
};
pub use compiler::{CompiledResult, Compiler};
