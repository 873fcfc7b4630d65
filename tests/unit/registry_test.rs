//! Tests for the in-memory registry

use std::sync::Arc;
use std::thread;

use pooled_cf_compiler::config::SubsystemConfig;
use pooled_cf_compiler::core::{
    BroadcastConfig, Compiler, ConnectionFactorySpec, ConnectorConfig, ConnectorResolver,
    DiscoveryGroupConfig, DiscoveryGroupResolver,
};
use pooled_cf_compiler::infra::InMemoryRegistry;

#[test]
fn test_registry_from_config() {
    let cfg: SubsystemConfig = serde_json::from_str(
        r#"{
            "connectors": { "netty": { "factory-class-name": "org.Netty", "params": { "port": "61616" } } },
            "discovery-groups": {
                "dg": { "broadcast": { "kind": "udp", "group-address": "231.7.7.7", "group-port": 9876, "local-bind-address": "10.0.0.4" } }
            }
        }"#,
    )
    .unwrap();
    let registry = InMemoryRegistry::from_config(&cfg);
    assert_eq!(registry.connector_names(), vec!["netty".to_string()]);
    let group = registry.resolve_discovery_group("dg").unwrap();
    assert!(matches!(
        group.broadcast,
        BroadcastConfig::Udp { group_port: 9876, local_bind_address: Some(ref addr), .. } if addr == "10.0.0.4"
    ));
}

#[test]
fn test_shared_registry_across_threads() {
    let registry = Arc::new(InMemoryRegistry::new());
    registry.register_connector("in-vm", ConnectorConfig::new("org.InVM"));
    registry.register_discovery_group("dg", DiscoveryGroupConfig::udp("230.0.0.1", 9876));
    let compiler = Arc::new(Compiler::new(
        Arc::clone(&registry),
        Arc::clone(&registry),
        Arc::clone(&registry),
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let compiler = Arc::clone(&compiler);
            thread::spawn(move || {
                let spec = if i % 2 == 0 {
                    ConnectionFactorySpec::new(format!("pcf-{i}")).with_connectors(["in-vm"])
                } else {
                    ConnectionFactorySpec::new(format!("pcf-{i}")).with_discovery_group("dg")
                };
                compiler.compile(&spec).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert!(result.name.starts_with("pcf-"));
    }
}

#[test]
fn test_runtime_registration_is_visible() {
    let registry = Arc::new(InMemoryRegistry::new());
    let compiler = Compiler::new(Arc::clone(&registry), Arc::clone(&registry), Arc::clone(&registry));
    let spec = ConnectionFactorySpec::new("pcf").with_connectors(["late"]);
    assert!(compiler.compile(&spec).is_err());

    registry.register_connector("late", ConnectorConfig::new("org.Late"));
    assert!(compiler.compile(&spec).is_ok());
}
