//! Partitions resolved options into resource-adapter config properties.

use std::collections::BTreeMap;

use crate::core::model::{ConfigProperty, ConfigPropertyBag, ConfigPropertyType, OptionValue};
use crate::core::schema::{AttributeSchema, Direction, REBALANCE_CONNECTIONS, RECONNECT_ATTEMPTS};

/// Reconnect attempts used when a factory does not configure any.
///
/// The resource adapter's own default retries forever, which suits a
/// colocated broker but hangs a standalone pooled factory.
pub const DEFAULT_MAX_RECONNECTS: &str = "5";

/// Result of partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOutcome {
    /// Partitioned properties.
    pub bag: ConfigPropertyBag,
    /// True when `reconnect-attempts` was synthesized.
    pub reconnect_attempts_defaulted: bool,
}

/// Walk the schema in declared order and partition every defined
/// resource-adapter option by its direction.
///
/// Options that are not in the schema are ignored here; callers validate
/// them beforehand.
#[must_use]
pub fn partition_properties(
    schema: &AttributeSchema,
    options: &BTreeMap<String, OptionValue>,
) -> PartitionOutcome {
    let mut bag = ConfigPropertyBag::default();
    let mut has_reconnect = false;

    for attribute in schema.entries() {
        if !attribute.direction.is_property() {
            continue;
        }
        let Some(kind) = attribute.value_type.property_type() else {
            continue;
        };
        let Some(value) = options.get(attribute.name) else {
            continue;
        };

        let property = ConfigProperty::new(attribute.name, kind, value.render());
        has_reconnect |= attribute.name == RECONNECT_ATTEMPTS;

        if attribute.name == REBALANCE_CONNECTIONS {
            if value.as_bool().unwrap_or(false) {
                bag.inbound.push(property);
            }
            continue;
        }

        match attribute.direction {
            Direction::Inbound => bag.inbound.push(property),
            Direction::Outbound => bag.outbound.push(property),
            Direction::Generic | Direction::NotAProperty => bag.generic.push(property),
        }
    }

    if !has_reconnect {
        bag.generic.push(ConfigProperty::new(
            RECONNECT_ATTEMPTS,
            ConfigPropertyType::Integer,
            DEFAULT_MAX_RECONNECTS,
        ));
    }

    PartitionOutcome {
        bag,
        reconnect_attempts_defaulted: !has_reconnect,
    }
}
