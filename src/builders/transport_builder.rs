//! Builds the transport section of a pooled connection factory: either an
//! explicit connector list or a discovery group.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::model::{ConfigProperty, ConfigPropertyType, ConnectionFactorySpec};
use crate::core::resolver::{
    BroadcastConfig, ConnectorConfig, ConnectorResolver, DiscoveryGroupResolver,
};
use crate::core::CompileError;

/// Connector factory class names, comma separated.
pub const CONNECTOR_CLASSNAME: &str = "connector-classname";
/// Connector parameters, `;` within a connector and `,` between connectors.
pub const CONNECTION_PARAMETERS: &str = "connection-parameters";
/// UDP group address.
pub const GROUP_ADDRESS: &str = "discoveryAddress";
/// UDP group port.
pub const GROUP_PORT: &str = "discoveryPort";
/// UDP local bind address.
pub const DISCOVERY_LOCAL_BIND_ADDRESS: &str = "discoveryLocalBindAddress";
/// Initial discovery wait.
pub const DISCOVERY_INITIAL_WAIT_TIMEOUT: &str = "discoveryInitialWaitTimeout";
/// Discovery refresh timeout.
pub const REFRESH_TIMEOUT: &str = "discoveryRefreshTimeout";
/// Cluster dispatcher channel name.
pub const JGROUPS_CHANNEL_NAME: &str = "jgroupsChannelName";
/// Registry key of the cluster dispatcher channel.
pub const JGROUPS_CHANNEL_REF_NAME: &str = "jgroupsChannelRefName";

/// A connector name with its resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConnector {
    /// Connector name.
    pub name: String,
    /// Resolved configuration.
    pub config: ConnectorConfig,
}

/// Discovery flavor, determined by the group's broadcast mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryFlavor {
    /// UDP multicast.
    Udp {
        /// Multicast group address.
        group_address: String,
        /// Multicast group port.
        group_port: u16,
        /// Local bind address.
        local_bind_address: Option<String>,
    },
    /// Cluster command dispatcher.
    ClusterDispatcher {
        /// Channel the dispatcher runs on.
        cluster_channel_name: String,
        /// Synthetic registry key, `<factory>:discovery<group>`.
        channel_ref_name: String,
    },
}

/// Discovery settings handed to the resource adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDescriptor {
    /// Discovery group name.
    pub group_name: String,
    /// Broadcast flavor.
    pub flavor: DiscoveryFlavor,
    /// Initial wait timeout in milliseconds.
    pub initial_wait_timeout_ms: i64,
    /// Refresh timeout in milliseconds.
    pub refresh_timeout_ms: i64,
}

/// Transport selection of a compiled factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportDescriptor {
    /// Explicit connectors, in declared order.
    Connectors(Vec<ResolvedConnector>),
    /// Discovery group.
    Discovery(DiscoveryDescriptor),
}

/// Transport descriptor plus the generic properties it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPlan {
    /// Descriptor.
    pub descriptor: TransportDescriptor,
    /// Generic resource-adapter properties, in emission order.
    pub properties: Vec<ConfigProperty>,
}

/// Which transport mode a spec selects, checked without consulting any
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode<'a> {
    /// Explicit connectors.
    Connectors(&'a [String]),
    /// Discovery group.
    Discovery(&'a str),
    /// First connector known to the resolver.
    AnyConnector,
}

/// Determine the transport mode of a spec.
///
/// # Errors
///
/// [`CompileError::InvalidSpec`] when both or neither of connectors and
/// discovery group are set (neither is allowed with `pick_any_connector`).
pub fn transport_mode(spec: &ConnectionFactorySpec) -> Result<TransportMode<'_>, CompileError> {
    match (spec.connectors.is_empty(), spec.discovery_group.as_deref()) {
        (false, Some(group)) => Err(CompileError::InvalidSpec(format!(
            "factory `{}` sets both connectors and discovery group `{group}`",
            spec.name
        ))),
        (false, None) => Ok(TransportMode::Connectors(&spec.connectors)),
        (true, Some(group)) => Ok(TransportMode::Discovery(group)),
        (true, None) if spec.pick_any_connector => Ok(TransportMode::AnyConnector),
        (true, None) => Err(CompileError::InvalidSpec(format!(
            "factory `{}` sets neither connectors nor a discovery group",
            spec.name
        ))),
    }
}

/// Build the transport section.
///
/// # Errors
///
/// [`CompileError::InvalidSpec`] for a bad transport selection,
/// [`CompileError::UnresolvedConnector`] / [`CompileError::UnresolvedDiscoveryGroup`]
/// when a reference does not resolve.
pub fn build_transport<C, D>(
    spec: &ConnectionFactorySpec,
    connectors: &C,
    discovery: &D,
) -> Result<TransportPlan, CompileError>
where
    C: ConnectorResolver + ?Sized,
    D: DiscoveryGroupResolver + ?Sized,
{
    match transport_mode(spec)? {
        TransportMode::Connectors(names) => build_connectors(names, connectors),
        TransportMode::Discovery(group) => build_discovery(&spec.name, group, discovery),
        TransportMode::AnyConnector => {
            let Some(first) = connectors.connector_names().into_iter().next() else {
                return Err(CompileError::InvalidSpec(format!(
                    "factory `{}` has no transport and no connector is defined",
                    spec.name
                )));
            };
            info!(factory = %spec.name, connector = %first, "using connector for pooled connection factory");
            build_connectors(std::slice::from_ref(&first), connectors)
        }
    }
}

fn build_connectors<C>(names: &[String], resolver: &C) -> Result<TransportPlan, CompileError>
where
    C: ConnectorResolver + ?Sized,
{
    let mut resolved = Vec::with_capacity(names.len());
    let mut class_names = Vec::with_capacity(names.len());
    let mut params = Vec::with_capacity(names.len());

    for name in names {
        let config = resolver
            .resolve_connector(name)
            .ok_or_else(|| CompileError::UnresolvedConnector(name.clone()))?;
        class_names.push(config.factory_class_name.clone());
        params.push(
            config
                .params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(";"),
        );
        resolved.push(ResolvedConnector {
            name: name.clone(),
            config,
        });
    }

    let mut properties = Vec::with_capacity(2);
    let class_names = class_names.join(",");
    if !class_names.is_empty() {
        properties.push(ConfigProperty::string(CONNECTOR_CLASSNAME, class_names));
    }
    let params = params.join(",");
    if !params.is_empty() {
        properties.push(ConfigProperty::string(CONNECTION_PARAMETERS, params));
    }

    Ok(TransportPlan {
        descriptor: TransportDescriptor::Connectors(resolved),
        properties,
    })
}

fn build_discovery<D>(factory: &str, group: &str, resolver: &D) -> Result<TransportPlan, CompileError>
where
    D: DiscoveryGroupResolver + ?Sized,
{
    let config = resolver
        .resolve_discovery_group(group)
        .ok_or_else(|| CompileError::UnresolvedDiscoveryGroup(group.to_owned()))?;

    let mut properties = Vec::with_capacity(5);
    let flavor = match config.broadcast {
        BroadcastConfig::Udp {
            group_address,
            group_port,
            local_bind_address,
        } => {
            properties.push(ConfigProperty::string(GROUP_ADDRESS, group_address.clone()));
            properties.push(ConfigProperty::new(
                GROUP_PORT,
                ConfigPropertyType::Integer,
                group_port.to_string(),
            ));
            if let Some(addr) = &local_bind_address {
                properties.push(ConfigProperty::string(DISCOVERY_LOCAL_BIND_ADDRESS, addr.clone()));
            }
            DiscoveryFlavor::Udp {
                group_address,
                group_port,
                local_bind_address,
            }
        }
        BroadcastConfig::ClusterDispatcher { channel_name, .. } => {
            let channel_ref_name = format!("{factory}:discovery{group}");
            properties.push(ConfigProperty::string(JGROUPS_CHANNEL_NAME, channel_name.clone()));
            properties.push(ConfigProperty::string(JGROUPS_CHANNEL_REF_NAME, channel_ref_name.clone()));
            DiscoveryFlavor::ClusterDispatcher {
                cluster_channel_name: channel_name,
                channel_ref_name,
            }
        }
    };
    properties.push(ConfigProperty::new(
        DISCOVERY_INITIAL_WAIT_TIMEOUT,
        ConfigPropertyType::Long,
        config.initial_wait_timeout_ms.to_string(),
    ));
    properties.push(ConfigProperty::new(
        REFRESH_TIMEOUT,
        ConfigPropertyType::Long,
        config.refresh_timeout_ms.to_string(),
    ));

    Ok(TransportPlan {
        descriptor: TransportDescriptor::Discovery(DiscoveryDescriptor {
            group_name: group.to_owned(),
            flavor,
            initial_wait_timeout_ms: config.initial_wait_timeout_ms,
            refresh_timeout_ms: config.refresh_timeout_ms,
        }),
        properties,
    })
}
