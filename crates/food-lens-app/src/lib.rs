#![warn(missing_docs)]
//! # food-lens-app
//!
//! ## Purpose
//! Orchestrates camera, upload, analysis, and UI state for `food-lens`.
//!
//! ## Responsibilities
//! - Own the camera session and enforce "one stream, capture only while live".
//! - Reject non-image uploads before any network call.
//! - Route images through the analysis client and record history.
//! - Load configuration from the environment and initialise logging.
//!
//! ## Data flow
//! Shell event -> [`CaptureController`] handler -> image blob ->
//! [`food_lens_api::FoodAnalyzer`] -> [`food_lens_ui::render_analysis`] ->
//! [`food_lens_ui::UiState`].
//!
//! ## Ownership and lifetimes
//! The controller exclusively owns the camera session and UI state; camera,
//! analyser, and clock are injected as `Arc<dyn _>` so shells and tests pick
//! their own implementations.
//!
//! ## Error model
//! Handler failures are [`ControllerError`]s that end up as toasts, never as
//! returned errors. Startup failures are [`AppError`]s.
//!
//! ## Security and privacy notes
//! Media bytes are not logged; log lines carry only sizes and MIME types.

mod config;
mod controller;
mod telemetry;

pub use config::{
    API_BASE_URL_ENV, API_TIMEOUT_MS_ENV, AppConfig, ConfigError, DEFAULT_API_BASE_URL,
    DEFAULT_API_TIMEOUT_MS, DEFAULT_LOG_FILTER, LOG_FILTER_ENV, api_timeout_from_env,
};
pub use controller::{CameraState, CaptureController, Clock, ControllerError, SystemClock};
pub use telemetry::init_tracing;

use std::sync::Arc;

use food_lens_api::{ApiClient, ApiError, HttpTransport};
use thiserror::Error;

/// Build-time application version loaded from root `VERSION`.
pub const APP_VERSION: &str = env!("FOOD_LENS_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Builds the HTTP-backed API client described by `config`.
///
/// # Errors
/// Returns [`AppError::Api`] when the transport cannot be created or the base
/// URL is rejected.
pub fn build_api_client(config: &AppConfig) -> Result<ApiClient, AppError> {
    let transport = HttpTransport::new(config.api_timeout)?;
    Ok(ApiClient::new(&config.api_base_url, Arc::new(transport))?)
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// API client construction error.
    #[error("api client error: {0}")]
    Api(#[from] ApiError),
    /// Logging could not be initialised.
    #[error("logging setup failed: {0}")]
    Logging(String),
    /// Input file could not be read.
    #[error("cannot read {path}: {source}")]
    Input {
        /// Offending path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
