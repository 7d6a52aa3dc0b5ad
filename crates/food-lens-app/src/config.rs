//! Environment-driven configuration.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend base URL variable.
pub const API_BASE_URL_ENV: &str = "FOOD_LENS_API_BASE_URL";
/// Per-request timeout variable, milliseconds.
pub const API_TIMEOUT_MS_ENV: &str = "FOOD_LENS_API_TIMEOUT_MS";
/// `tracing` filter directive variable.
pub const LOG_FILTER_ENV: &str = "FOOD_LENS_LOG";

/// Backend used when [`API_BASE_URL_ENV`] is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
/// Timeout used when [`API_TIMEOUT_MS_ENV`] is unset or invalid.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;
/// Filter used when [`LOG_FILTER_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "food_lens=info";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL.
    pub api_base_url: String,
    /// Per-request timeout.
    pub api_timeout: Duration,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBaseUrl`] when the base URL is not an
    /// absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var(API_BASE_URL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        validate_base_url(&api_base_url)?;

        Ok(Self {
            api_base_url,
            api_timeout: api_timeout_from_env(),
            log_filter: std::env::var(LOG_FILTER_ENV)
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Overrides the base URL, e.g. from a command-line flag.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBaseUrl`] for unusable URLs.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;
        self.api_base_url = base_url;
        Ok(self)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Reads the request timeout.
///
/// Semantics:
/// - Unset, unparsable, or `0` => [`DEFAULT_API_TIMEOUT_MS`].
/// - Any other integer => that many milliseconds.
pub fn api_timeout_from_env() -> Duration {
    let millis = std::env::var(API_TIMEOUT_MS_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .unwrap_or(DEFAULT_API_TIMEOUT_MS);
    Duration::from_millis(millis)
}

fn validate_base_url(candidate: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(candidate)
        .map_err(|error| ConfigError::InvalidBaseUrl(format!("{candidate}: {error}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{candidate}: scheme must be http or https"
        )));
    }
    Ok(())
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Base URL is malformed or not http(s).
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
}
