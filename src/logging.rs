//! Tracing setup for the `tasku-db` binary.
//!
//! Diagnostics go to stderr so stdout only carries probe output.
//!
//! Environment variables:
//!   RUST_LOG    # Log filter (default: info, or debug with --debug)

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
