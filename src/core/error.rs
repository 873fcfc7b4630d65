//! Error types for compiler operations.

use thiserror::Error;

/// Errors produced while compiling a connection factory definition.
///
/// Every variant is fatal: a compile call either returns a complete
/// [`CompiledResult`](crate::core::CompiledResult) or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The definition is structurally invalid (e.g. both or neither of
    /// connectors and discovery group are set).
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    /// A connector name did not resolve to a transport configuration.
    #[error("connector `{0}` is not defined")]
    UnresolvedConnector(String),
    /// A discovery group name did not resolve to a broadcast configuration.
    #[error("discovery group `{0}` is not defined")]
    UnresolvedDiscoveryGroup(String),
    /// A credential reference could not produce a clear-text secret.
    #[error("credential reference `{0}` could not be resolved")]
    UnresolvedCredential(String),
    /// An attribute name is not part of the schema.
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),
    /// Configuration document failed validation.
    #[error("config error: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
