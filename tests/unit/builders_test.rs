//! Tests for builder modules

use pooled_cf_compiler::builders::{
    build_pool_descriptor, compile_factories, partition_properties, PoolRequest, TransactionSupport,
    TransportDescriptor,
};
use pooled_cf_compiler::config::SubsystemConfig;
use pooled_cf_compiler::core::{AttributeSchema, CompileError, Compiler, OptionValue};
use pooled_cf_compiler::infra::InMemoryRegistry;

const DOC: &str = r#"{
    "connectors": {
        "in-vm": { "factory-class-name": "org.InVM", "params": { "serverId": "0" } }
    },
    "discovery-groups": {
        "dg": { "broadcast": { "kind": "cluster-dispatcher", "cluster-name": "activemq-cluster", "channel-name": "ee" } }
    },
    "credential-stores": { "cs": { "broker": "s3cret" } },
    "pooled-connection-factories": {
        "activemq-ra": {
            "entries": ["java:/JmsXA"],
            "connectors": ["in-vm"],
            "transaction": "xa"
        },
        "clustered-ra": {
            "entries": ["java:/ClusteredJmsXA"],
            "discovery-group": "dg",
            "transaction": "none",
            "credential-reference": { "store": "cs", "alias": "broker" }
        }
    }
}"#;

#[test]
fn test_compile_factories_from_config() {
    let cfg = SubsystemConfig::from_json_str(DOC).unwrap();
    let registry = InMemoryRegistry::from_config(&cfg);
    let compiler = Compiler::new(&registry, &registry, &registry);

    let compiled = compile_factories(&cfg, &compiler).unwrap();
    assert_eq!(compiled.len(), 2);

    let local = &compiled["activemq-ra"];
    assert!(local.pool.is_xa());
    assert_eq!(local.pool.min_size, Some(0));
    assert_eq!(local.pool.max_size, Some(20));
    assert!(matches!(local.transport, TransportDescriptor::Connectors(ref c) if c.len() == 1));

    let clustered = &compiled["clustered-ra"];
    assert_eq!(clustered.pool.transaction_support, TransactionSupport::None);
    assert_eq!(
        clustered.properties.generic("jgroupsChannelRefName").unwrap().value,
        "clustered-ra:discoverydg"
    );
    assert_eq!(clustered.properties.generic("password").unwrap().value, "s3cret");
}

#[test]
fn test_compile_factories_rejects_invalid_config() {
    let cfg = SubsystemConfig::default();
    let registry = InMemoryRegistry::new();
    let compiler = Compiler::new(&registry, &registry, &registry);
    assert!(matches!(
        compile_factories(&cfg, &compiler),
        Err(CompileError::Config(_))
    ));
}

#[test]
fn test_compile_factories_stops_on_missing_credential() {
    let mut cfg = SubsystemConfig::from_json_str(DOC).unwrap();
    cfg.credential_stores.clear();
    let registry = InMemoryRegistry::from_config(&cfg);
    let compiler = Compiler::new(&registry, &registry, &registry);
    assert_eq!(
        compile_factories(&cfg, &compiler).unwrap_err(),
        CompileError::UnresolvedCredential("cs/broker".to_string())
    );
}

#[test]
fn test_pool_request_local_transaction() {
    let pool = build_pool_descriptor(&PoolRequest {
        min_pool_size: Some(1),
        max_pool_size: None,
        transaction_support: "LocalTransaction",
        managed_connection_pool_class_name: None,
        enlistment_trace: Some(true),
    });
    assert!(!pool.is_xa());
    assert_eq!(pool.min_size, Some(1));
    assert_eq!(pool.max_size, None);
    assert_eq!(pool.enlistment_trace, Some(true));
}

#[test]
fn test_partition_inbound_and_outbound() {
    let schema = AttributeSchema::pooled();
    let mut options = std::collections::BTreeMap::new();
    options.insert("use-jndi".to_string(), OptionValue::Bool(true));
    options.insert("jndi-params".to_string(), OptionValue::from("a=b"));
    options.insert("allow-local-transactions".to_string(), OptionValue::Bool(false));
    let outcome = partition_properties(&schema, &options);
    let inbound: Vec<_> = outcome.bag.inbound.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(inbound, vec!["use-jndi", "jndi-params"]);
    assert_eq!(outcome.bag.outbound("allow-local-transactions").unwrap().value, "false");
}
