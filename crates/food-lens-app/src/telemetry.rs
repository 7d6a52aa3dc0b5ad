//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::{AppError, DEFAULT_LOG_FILTER};

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// An unparsable `filter` falls back to [`DEFAULT_LOG_FILTER`].
///
/// # Errors
/// Returns [`AppError::Logging`] when a global subscriber is already set.
pub fn init_tracing(filter: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}
