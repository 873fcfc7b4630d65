//! Tests for configuration validation

use pooled_cf_compiler::config::{SubsystemConfig, CONFIG_ENV_VAR};
use pooled_cf_compiler::core::{AttributeSchema, OptionValue};

const DOC: &str = r#"{
    "connectors": {
        "in-vm": { "factory-class-name": "org.InVM", "params": { "serverId": "0" } },
        "netty": { "factory-class-name": "org.Netty", "params": { "host": "localhost", "port": "61616" } }
    },
    "discovery-groups": {
        "dg": {
            "broadcast": { "kind": "udp", "group-address": "231.7.7.7", "group-port": 9876 },
            "initial-wait-timeout-ms": 5000
        }
    },
    "credential-stores": {
        "cs": { "broker": "s3cret" }
    },
    "pooled-connection-factories": {
        "activemq-ra": {
            "entries": ["java:/JmsXA", "java:jboss/DefaultJMSConnectionFactory"],
            "connectors": ["in-vm"],
            "transaction": "local",
            "min-pool-size": 2,
            "max-pool-size": -1,
            "reconnect-attempts": 3,
            "deserialization-white-list": ["org.acme.*"]
        },
        "remote-ra": {
            "entries": ["java:/RemoteJmsXA"],
            "discovery-group": "dg",
            "credential-reference": { "store": "cs", "alias": "broker" }
        }
    }
}"#;

#[test]
fn test_subsystem_config_from_json() {
    let cfg = SubsystemConfig::from_json_str(DOC).unwrap();
    assert_eq!(cfg.connectors.len(), 2);
    assert_eq!(cfg.discovery_groups["dg"].initial_wait_timeout_ms, 5_000);
    assert_eq!(cfg.discovery_groups["dg"].refresh_timeout_ms, 10_000);
    assert_eq!(cfg.credential_stores["cs"]["broker"], "s3cret");

    let ra = &cfg.pooled_connection_factories["activemq-ra"];
    assert_eq!(ra.attributes["reconnect-attempts"], OptionValue::Integer(3));
    assert_eq!(
        ra.attributes["deserialization-white-list"],
        OptionValue::List(vec!["org.acme.*".to_string()])
    );
}

#[test]
fn test_to_spec_lifts_pool_settings() {
    let cfg = SubsystemConfig::from_json_str(DOC).unwrap();
    let schema = AttributeSchema::pooled();
    let spec = cfg.pooled_connection_factories["activemq-ra"].to_spec("activemq-ra", &schema);
    assert_eq!(spec.name, "activemq-ra");
    assert_eq!(spec.min_pool_size, Some(2));
    assert_eq!(spec.max_pool_size, Some(-1));
    assert_eq!(spec.transaction, "local");
    assert!(!spec.options.contains_key("min-pool-size"));
    assert!(!spec.options.contains_key("transaction"));
    assert!(spec.options.contains_key("reconnect-attempts"));
}

#[test]
fn test_to_spec_uses_schema_defaults() {
    let cfg = SubsystemConfig::from_json_str(DOC).unwrap();
    let schema = AttributeSchema::pooled();
    let spec = cfg.pooled_connection_factories["remote-ra"].to_spec("remote-ra", &schema);
    assert_eq!(spec.min_pool_size, Some(0));
    assert_eq!(spec.max_pool_size, Some(20));
    assert_eq!(spec.transaction, "transaction");
    assert_eq!(spec.enlistment_trace, None);
    assert!(spec.credential_reference.is_some());
}

#[test]
fn test_specs_are_in_name_order() {
    let cfg = SubsystemConfig::from_json_str(DOC).unwrap();
    let names: Vec<_> = cfg.specs().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["activemq-ra".to_string(), "remote-ra".to_string()]);
}

#[test]
fn test_config_empty_factories() {
    let cfg = SubsystemConfig::default();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_rejects_both_transports() {
    let json = r#"{
        "connectors": { "in-vm": { "factory-class-name": "org.InVM" } },
        "discovery-groups": { "dg": { "broadcast": { "kind": "cluster-dispatcher", "cluster-name": "c", "channel-name": "ee" } } },
        "pooled-connection-factories": {
            "ra": { "entries": ["java:/JmsXA"], "connectors": ["in-vm"], "discovery-group": "dg" }
        }
    }"#;
    let err = SubsystemConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("mutually exclusive"), "{err}");
}

#[test]
fn test_config_rejects_unknown_connector() {
    let json = r#"{
        "pooled-connection-factories": {
            "ra": { "entries": ["java:/JmsXA"], "connectors": ["missing"] }
        }
    }"#;
    let err = SubsystemConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("unknown connector `missing`"), "{err}");
}

#[test]
fn test_config_rejects_unknown_attribute() {
    let json = r#"{
        "connectors": { "in-vm": { "factory-class-name": "org.InVM" } },
        "pooled-connection-factories": {
            "ra": { "entries": ["java:/JmsXA"], "connectors": ["in-vm"], "no-such-attribute": 1 }
        }
    }"#;
    let err = SubsystemConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("unknown attribute `no-such-attribute`"), "{err}");
}

#[test]
fn test_config_rejects_mistyped_attribute() {
    let json = r#"{
        "connectors": { "in-vm": { "factory-class-name": "org.InVM" } },
        "pooled-connection-factories": {
            "ra": { "entries": ["java:/JmsXA"], "connectors": ["in-vm"], "ha": "sometimes" }
        }
    }"#;
    assert!(SubsystemConfig::from_json_str(json).is_err());
}

#[test]
fn test_config_requires_entries() {
    let json = r#"{
        "connectors": { "in-vm": { "factory-class-name": "org.InVM" } },
        "pooled-connection-factories": { "ra": { "connectors": ["in-vm"] } }
    }"#;
    let err = SubsystemConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("entry"), "{err}");
}

#[test]
fn test_config_pick_any_connector_without_transport() {
    let json = r#"{
        "connectors": { "in-vm": { "factory-class-name": "org.InVM" } },
        "pooled-connection-factories": {
            "ra": { "entries": ["java:/JmsXA"], "pick-any-connector": true }
        }
    }"#;
    assert!(SubsystemConfig::from_json_str(json).is_ok());
}

#[test]
fn test_config_from_path_and_env() {
    let path = std::env::temp_dir().join(format!("pcf-config-{}.json", std::process::id()));
    std::fs::write(&path, DOC).unwrap();

    let from_path = SubsystemConfig::from_path(&path).unwrap();
    assert_eq!(from_path.pooled_connection_factories.len(), 2);

    std::env::set_var(CONFIG_ENV_VAR, &path);
    let from_env = SubsystemConfig::from_env().unwrap();
    assert_eq!(from_env, from_path);

    std::fs::remove_file(&path).unwrap();
    assert!(SubsystemConfig::from_path(&path).is_err());
}
