//! Request/response values and the `reqwest`-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use food_lens_core::MediaBlob;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

use crate::{ApiError, ApiTransport};

/// HTTP methods used by the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// Request body variants.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// `application/json` body.
    Json(Value),
    /// `multipart/form-data` body with a single file field.
    Multipart {
        /// Form field name (`image` or `audio`).
        field: &'static str,
        /// File name sent in the part's content disposition.
        file_name: String,
        /// File content and MIME type.
        blob: MediaBlob,
    },
}

/// One fully-resolved backend request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute endpoint URL.
    pub url: Url,
    /// Request body.
    pub body: RequestBody,
}

/// Raw backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport with a per-request timeout.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] when the TLS/HTTP stack cannot be
    /// initialised.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("food-lens/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart {
                field,
                file_name,
                blob,
            } => {
                let part = Part::bytes(blob.bytes)
                    .file_name(file_name)
                    .mime_str(&blob.mime_type)
                    .map_err(|error| {
                        ApiError::InvalidRequest(format!(
                            "unusable MIME type '{}': {error}",
                            blob.mime_type
                        ))
                    })?;
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse { status, body })
    }
}
