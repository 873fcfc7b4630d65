//! Compiler facade: turns one [`ConnectionFactorySpec`] into a
//! [`CompiledResult`] the resource-adapter runtime can activate.
//!
//! Stages run in a fixed order so errors surface in the order an operator
//! would fix them: validation, transport, pool, properties, credentials.
//! Validation never touches a collaborator.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builders::pool_builder::{build_pool_descriptor, PoolDescriptor, PoolRequest, TransactionMode};
use crate::builders::property_builder::partition_properties;
use crate::builders::transport_builder::{build_transport, transport_mode, TransportDescriptor};
use crate::core::model::{
    ConfigProperty, ConfigPropertyBag, ConfigPropertyType, ConnectionFactorySpec, CredentialReference,
    JndiBindings,
};
use crate::core::resolver::{ConnectorResolver, CredentialResolver, DiscoveryGroupResolver};
use crate::core::schema::{
    AttributeSchema, CREDENTIAL_REFERENCE, ENLISTMENT_TRACE, MANAGED_CONNECTION_POOL, MAX_POOL_SIZE,
    MIN_POOL_SIZE, PASSWORD, TRANSACTION,
};
use crate::core::CompileError;

/// Inbound prefix of queue destinations.
pub const QUEUE_PREFIX: (&str, &str) = ("queuePrefix", "jms.queue.");
/// Inbound prefix of topic destinations.
pub const TOPIC_PREFIX: (&str, &str) = ("topicPrefix", "jms.topic.");
/// Outbound default session destination type.
pub const SESSION_DEFAULT_TYPE: (&str, &str) = ("SessionDefaultType", "javax.jms.Queue");
/// Outbound try-lock timeout, disabled.
pub const USE_TRY_LOCK: (&str, &str) = ("UseTryLock", "0");

/// Attributes carried by a dedicated [`ConnectionFactorySpec`] field, with
/// that field's name. Setting them through `options` is rejected.
const FIELD_ATTRIBUTES: &[(&str, &str)] = &[
    ("entries", "entries"),
    ("connectors", "connectors"),
    ("discovery-group", "discovery_group"),
    (MIN_POOL_SIZE, "min_pool_size"),
    (MAX_POOL_SIZE, "max_pool_size"),
    (TRANSACTION, "transaction"),
    (MANAGED_CONNECTION_POOL, "managed_connection_pool"),
    (ENLISTMENT_TRACE, "enlistment_trace"),
    (CREDENTIAL_REFERENCE, "credential_reference"),
];

/// Output of one compile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledResult {
    /// Factory name.
    pub name: String,
    /// JNDI bindings, when the definition declares entries.
    pub bindings: Option<JndiBindings>,
    /// Resource-adapter properties by direction.
    pub properties: ConfigPropertyBag,
    /// Transport selection.
    pub transport: TransportDescriptor,
    /// Connection pool descriptor.
    pub pool: PoolDescriptor,
    /// True when `reconnect-attempts` was synthesized.
    pub reconnect_attempts_defaulted: bool,
}

/// Compiles pooled connection factory specs against injected resolvers.
///
/// Holds no mutable state; one instance can compile any number of specs,
/// from several threads when the resolvers allow it.
#[derive(Debug, Clone)]
pub struct Compiler<C, D, K> {
    connectors: C,
    discovery: D,
    credentials: K,
    schema: AttributeSchema,
}

impl<C, D, K> Compiler<C, D, K>
where
    C: ConnectorResolver,
    D: DiscoveryGroupResolver,
    K: CredentialResolver,
{
    /// Create a compiler over the pooled attribute schema.
    pub fn new(connectors: C, discovery: D, credentials: K) -> Self {
        Self {
            connectors,
            discovery,
            credentials,
            schema: AttributeSchema::pooled(),
        }
    }

    /// Attribute schema options are checked against.
    pub const fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    /// Compile one spec.
    ///
    /// # Errors
    ///
    /// - [`CompileError::InvalidSpec`] / [`CompileError::UnknownAttribute`] when
    ///   the definition itself is malformed; no resolver is consulted then.
    /// - [`CompileError::UnresolvedConnector`] /
    ///   [`CompileError::UnresolvedDiscoveryGroup`] for dangling transport references.
    /// - [`CompileError::UnresolvedCredential`] when the credential reference
    ///   yields no secret.
    pub fn compile(&self, spec: &ConnectionFactorySpec) -> Result<CompiledResult, CompileError> {
        self.validate(spec)?;

        let transport = build_transport(spec, &self.connectors, &self.discovery)?;

        let support = TransactionMode::from_user_str(&spec.transaction).support();
        let pool = build_pool_descriptor(&PoolRequest {
            min_pool_size: spec.min_pool_size,
            max_pool_size: spec.max_pool_size,
            transaction_support: support.as_str(),
            managed_connection_pool_class_name: spec.managed_connection_pool.as_deref(),
            enlistment_trace: spec.enlistment_trace,
        });

        let partition = partition_properties(&self.schema, &spec.options);

        let password = spec
            .credential_reference
            .as_ref()
            .map(|reference| self.resolve_password(reference))
            .transpose()?;

        let mut generic = transport.properties;
        generic.extend(partition.bag.generic);
        if let Some(secret) = password {
            generic.push(ConfigProperty::string(PASSWORD, secret));
        }

        let mut inbound = partition.bag.inbound;
        inbound.push(ConfigProperty::string(QUEUE_PREFIX.0, QUEUE_PREFIX.1));
        inbound.push(ConfigProperty::string(TOPIC_PREFIX.0, TOPIC_PREFIX.1));

        let mut outbound = partition.bag.outbound;
        outbound.push(ConfigProperty::string(SESSION_DEFAULT_TYPE.0, SESSION_DEFAULT_TYPE.1));
        outbound.push(ConfigProperty::new(
            USE_TRY_LOCK.0,
            ConfigPropertyType::Integer,
            USE_TRY_LOCK.1,
        ));

        let properties = ConfigPropertyBag {
            generic,
            inbound,
            outbound,
        };

        debug!(
            factory = %spec.name,
            generic = properties.generic.len(),
            inbound = properties.inbound.len(),
            outbound = properties.outbound.len(),
            transaction = %pool.transaction_support,
            reconnect_defaulted = partition.reconnect_attempts_defaulted,
            "compiled pooled connection factory"
        );

        Ok(CompiledResult {
            name: spec.name.clone(),
            bindings: spec.bindings(),
            properties,
            transport: transport.descriptor,
            pool,
            reconnect_attempts_defaulted: partition.reconnect_attempts_defaulted,
        })
    }

    fn validate(&self, spec: &ConnectionFactorySpec) -> Result<(), CompileError> {
        if spec.name.trim().is_empty() {
            return Err(CompileError::InvalidSpec("factory name must not be empty".into()));
        }
        for (name, value) in &spec.options {
            let attribute = self.schema.attribute(name)?;
            let typed_field = FIELD_ATTRIBUTES.iter().find(|(key, _)| *key == name.as_str());
            if let Some((_, field)) = typed_field {
                return Err(CompileError::InvalidSpec(format!(
                    "factory `{}`: `{name}` must be set through `{field}`, not as an option",
                    spec.name
                )));
            }
            if !attribute.value_type.accepts(value) {
                return Err(CompileError::InvalidSpec(format!(
                    "factory `{}`: `{name}` expects {:?}, got `{}`",
                    spec.name,
                    attribute.value_type,
                    value.render()
                )));
            }
        }

        transport_mode(spec)?;

        if spec.credential_reference.is_some() && spec.options.contains_key(PASSWORD) {
            return Err(CompileError::InvalidSpec(format!(
                "factory `{}` sets both `{PASSWORD}` and a credential reference",
                spec.name
            )));
        }
        Ok(())
    }

    fn resolve_password(&self, reference: &CredentialReference) -> Result<String, CompileError> {
        if reference.store.is_none() {
            if let Some(secret) = &reference.clear_text {
                return Ok(secret.clone());
            }
        }
        self.credentials
            .resolve_credential(reference)
            .ok_or_else(|| CompileError::UnresolvedCredential(reference.to_string()))
    }
}
