//! Logging bootstrap for unit tests.

use tracing_subscriber::EnvFilter;

/// Install a quiet subscriber once for the whole test binary. Safe to
/// call repeatedly; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
