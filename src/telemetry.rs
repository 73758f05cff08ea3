//! Logging setup shared by the executables.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// the filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// configures a tracing subscriber that will log to STDERR, filtered by `RUST_LOG`
///
/// Does nothing if a global subscriber is already installed.
pub fn subscriber_config() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        // log to stderr instead of stdout, stdout is kept for command output
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
