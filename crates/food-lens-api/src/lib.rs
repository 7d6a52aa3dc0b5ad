#![warn(missing_docs)]
//! # food-lens-api
//!
//! ## Purpose
//! Client for the food analysis backend and its auxiliary AI endpoints.
//!
//! ## Responsibilities
//! - Build requests for every backend endpoint relative to one base URL.
//! - Execute them through an injectable [`ApiTransport`].
//! - Substitute a local stand-in whenever a call fails, so callers never see
//!   an error.
//!
//! ## Data flow
//! Caller -> [`ApiClient`] builds [`ApiRequest`] -> [`ApiTransport::send`] ->
//! status check -> JSON decode -> typed response, or stand-in on any failure.
//!
//! ## Ownership and lifetimes
//! Requests own their bodies so transports can move them into futures.
//! The client is shared behind `Arc` by the controller and the CLI.
//!
//! ## Error model
//! [`ApiError`] exists for transports and internal plumbing. Public client
//! methods swallow it after logging at `warn`.
//!
//! ## Security and privacy notes
//! Image and audio bytes are never logged; only endpoint names, statuses,
//! and sizes are.

mod client;
mod transport;

pub use client::{ApiClient, Endpoint, FoodAnalyzer};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, RequestBody};

use async_trait::async_trait;
use food_lens_analysis_contract::AnalysisContractError;
use thiserror::Error;

/// Abstract transport used by [`ApiClient`].
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Sends one request and returns the raw response.
    ///
    /// Non-2xx statuses are returned as `Ok`; the client decides what they
    /// mean.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] or [`ApiError::Timeout`] when no
    /// response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL could not be parsed or uses an unsupported scheme.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// Request could not be built (bad MIME type, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Connection-level failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Request exceeded its deadline.
    #[error("request timed out")]
    Timeout,
    /// Backend answered with a non-2xx status.
    #[error("backend returned HTTP {0}")]
    Status(u16),
    /// Response body was not the expected JSON.
    #[error("response decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Analysis response violated its contract.
    #[error(transparent)]
    Contract(#[from] AnalysisContractError),
}

impl ApiError {
    /// Short label used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidBaseUrl(_) | ApiError::InvalidRequest(_) => "request",
            ApiError::Transport(_) | ApiError::Timeout => "transport",
            ApiError::Status(_) => "http_status",
            ApiError::Decode(_) | ApiError::Contract(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}
