//! Shared utilities: logging setup, reconnect backoff, exchange
//! environment selection.

mod backoff;
mod environment;

pub use backoff::ReconnectBackoff;
pub use environment::{FuturesEnvironment, ParseEnvironmentError};

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to `info` when unset or unparseable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
