//! Telemetry helpers for structured logging.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "pooled_cf_compiler=info";

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`]. Does nothing when a global subscriber already exists.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
