//! Builders for the transport, pool and property sections of a compiled
//! factory, plus bulk compilation from configuration.

pub mod factory_builder;
pub mod pool_builder;
pub mod property_builder;
pub mod transport_builder;

pub use factory_builder::compile_factories;
pub use pool_builder::{
    build_pool_descriptor, FlushStrategy, PoolDescriptor, PoolKind, PoolRequest, RecoveryPolicy,
    SecurityMode, TransactionMode, TransactionSupport, ValidationPolicy, XaPoolSettings,
};
pub use property_builder::{partition_properties, PartitionOutcome, DEFAULT_MAX_RECONNECTS};
pub use transport_builder::{
    build_transport, DiscoveryDescriptor, DiscoveryFlavor, ResolvedConnector, TransportDescriptor,
    TransportPlan,
};
