//! Global tracing subscriber for the command-line tool

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber writing to stderr
///
/// `RUST_LOG` overrides the default level (`info`, or `warn` when quiet).
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(quiet: bool) -> bool {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
