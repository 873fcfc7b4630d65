//! Tests for error types

use pooled_cf_compiler::core::CompileError;

#[test]
fn test_invalid_spec_error() {
    let err = CompileError::InvalidSpec("both transports set".to_string());
    assert_eq!(format!("{}", err), "invalid spec: both transports set");
}

#[test]
fn test_unresolved_connector_error() {
    let err = CompileError::UnresolvedConnector("netty".to_string());
    assert_eq!(format!("{}", err), "connector `netty` is not defined");
}

#[test]
fn test_unresolved_discovery_group_error() {
    let err = CompileError::UnresolvedDiscoveryGroup("dg-group1".to_string());
    assert_eq!(format!("{}", err), "discovery group `dg-group1` is not defined");
}

#[test]
fn test_unresolved_credential_error() {
    let err = CompileError::UnresolvedCredential("cs/broker".to_string());
    assert_eq!(format!("{}", err), "credential reference `cs/broker` could not be resolved");
}

#[test]
fn test_unknown_attribute_error() {
    let err = CompileError::UnknownAttribute("ca-reference".to_string());
    assert_eq!(format!("{}", err), "unknown attribute `ca-reference`");
}

#[test]
fn test_config_error_converts_to_anyhow() {
    let err: anyhow::Error = CompileError::Config("empty".to_string()).into();
    assert_eq!(err.to_string(), "config error: empty");
}
