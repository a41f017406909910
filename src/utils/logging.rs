//! Tracing initialization
//!
//! Sets up the global tracing subscriber. `RUST_LOG` takes precedence over
//! the configured level so operators can raise verbosity without a config
//! change.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Must be called at most once per process; intended to be called from
/// `main` before the server starts.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
