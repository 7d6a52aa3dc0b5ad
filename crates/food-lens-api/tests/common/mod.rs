//! Shared fixtures for API client integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use food_lens_api::{ApiError, ApiRequest, ApiResponse, ApiTransport};
use food_lens_core::MediaBlob;

/// Minimal JPEG-looking image blob.
#[allow(dead_code)]
pub fn fixture_jpeg() -> MediaBlob {
    MediaBlob::new("image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xD9])
        .expect("fixture blob should be valid")
        .with_file_name("lunch.jpg")
}

/// Minimal audio blob.
#[allow(dead_code)]
pub fn fixture_audio() -> MediaBlob {
    MediaBlob::new("audio/webm", vec![0x1A, 0x45, 0xDF, 0xA3]).expect("fixture blob should be valid")
}

/// Transport that never reaches a backend.
#[derive(Debug, Default)]
pub struct UnreachableTransport;

#[async_trait]
impl ApiTransport for UnreachableTransport {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
        Err(ApiError::Transport("connection refused".to_string()))
    }
}

/// Transport that records every request and answers with a fixed response.
#[derive(Debug)]
pub struct RecordingTransport {
    status: u16,
    body: Vec<u8>,
    requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl RecordingTransport {
    /// Answers every request with `status` and `body`.
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of the recorded requests.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("request log lock should work").clone()
    }
}

#[async_trait]
impl ApiTransport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests
            .lock()
            .expect("request log lock should work")
            .push(request);
        Ok(ApiResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}
