//! Builders to compile every pooled connection factory of a configuration.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::SubsystemConfig;
use crate::core::resolver::{ConnectorResolver, CredentialResolver, DiscoveryGroupResolver};
use crate::core::{CompileError, CompiledResult, Compiler};

/// Validate `cfg`, then compile each of its factories with `compiler`.
///
/// Stops at the first failing factory; no partial map is returned.
///
/// # Errors
///
/// [`CompileError::Config`] when the document is invalid, otherwise the
/// first compile error.
pub fn compile_factories<C, D, K>(
    cfg: &SubsystemConfig,
    compiler: &Compiler<C, D, K>,
) -> Result<BTreeMap<String, CompiledResult>, CompileError>
where
    C: ConnectorResolver,
    D: DiscoveryGroupResolver,
    K: CredentialResolver,
{
    cfg.validate()
        .map_err(|e| CompileError::Config(format!("config invalid: {e}")))?;

    let mut compiled = BTreeMap::new();
    for spec in cfg.specs() {
        let result = compiler.compile(&spec)?;
        compiled.insert(spec.name.clone(), result);
    }
    info!(count = compiled.len(), "compiled pooled connection factories");
    Ok(compiled)
}
