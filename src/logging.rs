//! `tracing` subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the filter from a directive string, falling back to [`DEFAULT_LOG_FILTER`] when it
/// does not parse.
pub fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install a fmt subscriber writing to stderr. Stdout carries the assistant text.
///
/// A second call is a no-op.
pub fn init_logging(directives: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
