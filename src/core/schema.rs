//! Connection factory attribute schema.
//!
//! One static table per variant, declared in the same order as the
//! subsystem XSD. The pooled variant is the common table followed by the
//! pooled-only attributes, with a handful of defaults overridden. Property
//! partitioning walks this order, so reordering the tables changes output.
//!
//! Properties are emitted under these kebab-case attribute names. The
//! Artemis resource adapter itself expects camel-case bean names
//! (`clientFailureCheckPeriod`, `userName`, `clientID`,
//! `rebalanceConnections`); mapping to those is left to the runtime that
//! activates the compiled result.

use serde::Serialize;

use crate::core::model::{ConfigPropertyType, OptionValue};
use crate::core::CompileError;

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    /// Boolean.
    Boolean,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// Decimal number.
    Decimal,
    /// String.
    String,
    /// List of strings, rendered comma separated.
    StringList,
    /// Structured value (e.g. a credential reference).
    Object,
}

impl ValueType {
    /// Resource-adapter property type for values of this type, if any.
    #[must_use]
    pub const fn property_type(self) -> Option<ConfigPropertyType> {
        match self {
            Self::Boolean => Some(ConfigPropertyType::Boolean),
            Self::Int => Some(ConfigPropertyType::Integer),
            Self::Long => Some(ConfigPropertyType::Long),
            Self::Decimal => Some(ConfigPropertyType::Double),
            Self::String | Self::StringList => Some(ConfigPropertyType::String),
            Self::Object => None,
        }
    }

    /// Whether `value` is acceptable for this type.
    #[must_use]
    pub fn accepts(self, value: &OptionValue) -> bool {
        match (self, value) {
            (Self::Boolean, OptionValue::Bool(_))
            | (Self::Long, OptionValue::Integer(_))
            | (Self::Decimal, OptionValue::Decimal(_) | OptionValue::Integer(_))
            | (Self::String, OptionValue::Text(_))
            | (Self::StringList, OptionValue::List(_)) => true,
            (Self::Int, OptionValue::Integer(v)) => i32::try_from(*v).is_ok(),
            (Self::Boolean, OptionValue::Text(s)) => {
                s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
            }
            // Text is rendered verbatim, so it must already be in range and unpadded.
            (Self::Int, OptionValue::Text(s)) => s.parse::<i32>().is_ok(),
            (Self::Long, OptionValue::Text(s)) => s.parse::<i64>().is_ok(),
            _ => false,
        }
    }
}

/// Where an attribute ends up in the resource-adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Resource-adapter level property.
    Generic,
    /// Activation-spec property.
    Inbound,
    /// Managed connection factory property.
    Outbound,
    /// Affects the factory definition only, never emitted as a property.
    NotAProperty,
}

impl Direction {
    /// True for the three property-carrying directions.
    #[must_use]
    pub const fn is_property(self) -> bool {
        !matches!(self, Self::NotAProperty)
    }
}

/// Default value of an attribute. Const-constructible counterpart of [`OptionValue`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Decimal default.
    Decimal(f64),
    /// String default.
    Text(&'static str),
}

impl DefaultValue {
    /// Owned option value.
    #[must_use]
    pub fn to_value(self) -> OptionValue {
        match self {
            Self::Bool(b) => OptionValue::Bool(b),
            Self::Integer(v) => OptionValue::Integer(v),
            Self::Decimal(v) => OptionValue::Decimal(v),
            Self::Text(s) => OptionValue::Text(s.to_owned()),
        }
    }
}

/// Schema entry for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Attribute {
    /// Canonical attribute name.
    pub name: &'static str,
    /// Value type.
    pub value_type: ValueType,
    /// Default value, if the attribute has one.
    pub default: Option<DefaultValue>,
    /// Directional classification.
    pub direction: Direction,
}

/// Which flavor of connection factory a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FactoryVariant {
    /// Plain JMS connection factory.
    Regular,
    /// Resource-adapter backed pooled connection factory.
    Pooled,
}

/// Name of the inbound rebalance attribute, which is only emitted when enabled.
pub const REBALANCE_CONNECTIONS: &str = "rebalance-connections";
/// Name of the reconnect attribute.
pub const RECONNECT_ATTEMPTS: &str = "reconnect-attempts";
/// Name of the plain password attribute.
pub const PASSWORD: &str = "password";
/// Name of the credential reference attribute.
pub const CREDENTIAL_REFERENCE: &str = "credential-reference";
/// Name of the minimum pool size attribute.
pub const MIN_POOL_SIZE: &str = "min-pool-size";
/// Name of the maximum pool size attribute.
pub const MAX_POOL_SIZE: &str = "max-pool-size";
/// Name of the transaction mode attribute.
pub const TRANSACTION: &str = "transaction";
/// Name of the managed connection pool attribute.
pub const MANAGED_CONNECTION_POOL: &str = "managed-connection-pool";
/// Name of the enlistment trace attribute.
pub const ENLISTMENT_TRACE: &str = "enlistment-trace";

const fn attr(
    name: &'static str,
    value_type: ValueType,
    default: Option<DefaultValue>,
    direction: Direction,
) -> Attribute {
    Attribute {
        name,
        value_type,
        default,
        direction,
    }
}

use self::DefaultValue::{Bool, Decimal, Integer, Text};
use self::Direction::{Generic, Inbound, NotAProperty, Outbound};

const COMMON: &[Attribute] = &[
    attr("discovery-group", ValueType::String, None, NotAProperty),
    attr("connectors", ValueType::StringList, None, NotAProperty),
    attr("entries", ValueType::StringList, None, NotAProperty),
    attr("ha", ValueType::Boolean, Some(Bool(false)), NotAProperty),
    attr("client-failure-check-period", ValueType::Long, Some(Integer(30_000)), Generic),
    attr("connection-ttl", ValueType::Long, Some(Integer(60_000)), Generic),
    attr("call-timeout", ValueType::Long, Some(Integer(30_000)), Generic),
    attr("call-failover-timeout", ValueType::Long, Some(Integer(-1)), Generic),
    attr("consumer-window-size", ValueType::Int, Some(Integer(1_048_576)), Generic),
    attr("consumer-max-rate", ValueType::Int, Some(Integer(-1)), Generic),
    attr("confirmation-window-size", ValueType::Int, Some(Integer(-1)), Generic),
    attr("producer-window-size", ValueType::Int, Some(Integer(65_536)), Generic),
    attr("producer-max-rate", ValueType::Int, Some(Integer(-1)), Generic),
    attr("protocol-manager-factory", ValueType::String, None, Generic),
    attr("compress-large-messages", ValueType::Boolean, Some(Bool(false)), Generic),
    attr("cache-large-message-client", ValueType::Boolean, Some(Bool(false)), Generic),
    attr("min-large-message-size", ValueType::Int, Some(Integer(102_400)), Generic),
    attr("client-id", ValueType::String, None, Generic),
    attr("dups-ok-batch-size", ValueType::Int, Some(Integer(1_048_576)), Generic),
    attr("transaction-batch-size", ValueType::Int, Some(Integer(1_048_576)), Generic),
    attr("block-on-acknowledge", ValueType::Boolean, Some(Bool(false)), Generic),
    attr("block-on-non-durable-send", ValueType::Boolean, Some(Bool(false)), Generic),
    attr("block-on-durable-send", ValueType::Boolean, Some(Bool(true)), Generic),
    attr("auto-group", ValueType::Boolean, Some(Bool(false)), Generic),
    attr("pre-acknowledge", ValueType::Boolean, Some(Bool(false)), Generic),
    attr("retry-interval", ValueType::Long, Some(Integer(2_000)), Generic),
    attr("retry-interval-multiplier", ValueType::Decimal, Some(Decimal(1.0)), Generic),
    attr("max-retry-interval", ValueType::Long, Some(Integer(2_000)), Generic),
    attr(RECONNECT_ATTEMPTS, ValueType::Int, Some(Integer(0)), Generic),
    attr("failover-on-initial-connection", ValueType::Boolean, Some(Bool(false)), Generic),
    attr(
        "connection-load-balancing-policy-class-name",
        ValueType::String,
        Some(Text(
            "org.apache.activemq.artemis.api.core.client.loadbalance.RoundRobinConnectionLoadBalancingPolicy",
        )),
        Generic,
    ),
    attr("use-global-pools", ValueType::Boolean, Some(Bool(true)), Generic),
    attr("scheduled-thread-pool-max-size", ValueType::Int, Some(Integer(5)), Generic),
    attr("thread-pool-max-size", ValueType::Int, Some(Integer(30)), Generic),
    attr("group-id", ValueType::String, None, Generic),
    attr("deserialization-black-list", ValueType::StringList, None, Generic),
    attr("deserialization-white-list", ValueType::StringList, None, Generic),
    attr("initial-message-packet-size", ValueType::Int, Some(Integer(1_500)), Generic),
];

const REGULAR: &[Attribute] = &[attr(
    "factory-type",
    ValueType::String,
    Some(Text("GENERIC")),
    NotAProperty,
)];

const POOLED: &[Attribute] = &[
    // inbound config
    attr("use-jndi", ValueType::Boolean, None, Inbound),
    attr("jndi-params", ValueType::String, None, Inbound),
    attr(REBALANCE_CONNECTIONS, ValueType::Boolean, Some(Bool(false)), Inbound),
    attr("use-local-tx", ValueType::Boolean, None, Inbound),
    attr("setup-attempts", ValueType::Int, None, Inbound),
    attr("setup-interval", ValueType::Long, None, Inbound),
    // outbound config
    attr("allow-local-transactions", ValueType::Boolean, Some(Bool(false)), Outbound),
    attr("statistics-enabled", ValueType::Boolean, Some(Bool(false)), NotAProperty),
    attr(TRANSACTION, ValueType::String, Some(Text("transaction")), NotAProperty),
    attr("user", ValueType::String, None, Generic),
    attr(PASSWORD, ValueType::String, None, Generic),
    attr(CREDENTIAL_REFERENCE, ValueType::Object, None, NotAProperty),
    attr(MANAGED_CONNECTION_POOL, ValueType::String, None, NotAProperty),
    attr(ENLISTMENT_TRACE, ValueType::Boolean, None, NotAProperty),
    attr(MIN_POOL_SIZE, ValueType::Int, Some(Integer(0)), NotAProperty),
    attr(MAX_POOL_SIZE, ValueType::Int, Some(Integer(20)), NotAProperty),
    attr("use-auto-recovery", ValueType::Boolean, Some(Bool(true)), Generic),
    attr("initial-connect-attempts", ValueType::Int, Some(Integer(1)), Generic),
];

/// Per-variant default overrides applied on top of the common table.
const DEFAULT_OVERRIDES: &[(FactoryVariant, &str, DefaultValue)] = &[
    (FactoryVariant::Pooled, RECONNECT_ATTEMPTS, Integer(-1)),
    (FactoryVariant::Pooled, "ha", Bool(true)),
];

/// Ordered attribute table for one factory variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSchema {
    variant: FactoryVariant,
    attributes: Vec<Attribute>,
}

impl AttributeSchema {
    /// Build the schema for a variant.
    #[must_use]
    pub fn for_variant(variant: FactoryVariant) -> Self {
        let specific = match variant {
            FactoryVariant::Regular => REGULAR,
            FactoryVariant::Pooled => POOLED,
        };
        let attributes = COMMON
            .iter()
            .chain(specific)
            .map(|a| {
                let default = DEFAULT_OVERRIDES
                    .iter()
                    .find(|(v, name, _)| *v == variant && *name == a.name)
                    .map_or(a.default, |(_, _, d)| Some(*d));
                Attribute { default, ..*a }
            })
            .collect();
        Self {
            variant,
            attributes,
        }
    }

    /// Schema of a pooled connection factory.
    #[must_use]
    pub fn pooled() -> Self {
        Self::for_variant(FactoryVariant::Pooled)
    }

    /// Schema of a regular connection factory.
    #[must_use]
    pub fn regular() -> Self {
        Self::for_variant(FactoryVariant::Regular)
    }

    /// Variant this schema describes.
    #[must_use]
    pub const fn variant(&self) -> FactoryVariant {
        self.variant
    }

    /// Attributes in declared order.
    pub fn entries(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when the schema has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Look up an attribute that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnknownAttribute`] if `name` is not in the schema.
    pub fn attribute(&self, name: &str) -> Result<&Attribute, CompileError> {
        self.get(name)
            .ok_or_else(|| CompileError::UnknownAttribute(name.to_owned()))
    }

    /// Default value of an attribute, if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnknownAttribute`] if `name` is not in the schema.
    pub fn default_value(&self, name: &str) -> Result<Option<OptionValue>, CompileError> {
        Ok(self.attribute(name)?.default.map(DefaultValue::to_value))
    }
}
