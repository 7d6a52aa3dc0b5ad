//! Backend client with local fallbacks.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use food_lens_analysis_contract::{
    ChatReply, ChatRequest, GestureRequest, GestureResult, NutritionAdvice, Transcript,
    mock_food_analysis, parse_analysis_result,
};
use food_lens_core::{AnalysisResult, MediaBlob, Nutrition};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::{ApiError, ApiRequest, ApiResponse, ApiTransport, HttpMethod, RequestBody};

/// Backend endpoints, relative to the client's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /api/analyze-food`
    AnalyzeFood,
    /// `POST /api/recognize-gesture`
    RecognizeGesture,
    /// `POST /api/speech-to-text`
    SpeechToText,
    /// `POST /api/chat`
    Chat,
    /// `POST /api/nutrition-advice`
    NutritionAdvice,
    /// `GET /api/health`
    Health,
}

impl Endpoint {
    /// Path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::AnalyzeFood => "api/analyze-food",
            Endpoint::RecognizeGesture => "api/recognize-gesture",
            Endpoint::SpeechToText => "api/speech-to-text",
            Endpoint::Chat => "api/chat",
            Endpoint::NutritionAdvice => "api/nutrition-advice",
            Endpoint::Health => "api/health",
        }
    }

    /// HTTP method the endpoint expects.
    pub fn method(self) -> HttpMethod {
        match self {
            Endpoint::Health => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Endpoint::AnalyzeFood => "analyze_food",
            Endpoint::RecognizeGesture => "recognize_gesture",
            Endpoint::SpeechToText => "speech_to_text",
            Endpoint::Chat => "chat",
            Endpoint::NutritionAdvice => "nutrition_advice",
            Endpoint::Health => "health",
        }
    }
}

/// Seam the controller uses to obtain analyses.
#[async_trait]
pub trait FoodAnalyzer: Send + Sync {
    /// Analyses one image. Never fails; see [`ApiClient::analyze_food`].
    async fn analyze_food(&self, image: &MediaBlob) -> AnalysisResult;
}

/// Backend client. Every public call returns a value, real or substituted.
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn ApiTransport>,
    rng: Mutex<StdRng>,
}

impl ApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidBaseUrl`] when the URL does not parse, is
    /// not `http`/`https`, or cannot carry a path.
    pub fn new(base_url: &str, transport: Arc<dyn ApiTransport>) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url.trim())
            .map_err(|error| ApiError::InvalidBaseUrl(format!("{base_url}: {error}")))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{base_url}: expected an http(s) URL"
            )));
        }

        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            transport,
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Replaces the mock generator's RNG, for reproducible stand-ins.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint against the base URL.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidBaseUrl`] if joining fails.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint.path())
            .map_err(|error| ApiError::InvalidBaseUrl(error.to_string()))
    }

    /// Posts an image to `/api/analyze-food`.
    ///
    /// On any failure returns a mock analysis built from the fixed food table.
    pub async fn analyze_food(&self, image: &MediaBlob) -> AnalysisResult {
        let body = RequestBody::Multipart {
            field: "image",
            file_name: image.upload_file_name("image"),
            blob: image.clone(),
        };

        let outcome = match self.fetch(Endpoint::AnalyzeFood, body).await {
            Ok(response) => parse_analysis_result(&String::from_utf8_lossy(&response.body))
                .map_err(ApiError::from),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(result) => {
                debug!(
                    stage = "api",
                    action = "analyze_food",
                    foods = result.foods.len(),
                    "analysis received"
                );
                result
            }
            Err(error) => {
                log_fallback(Endpoint::AnalyzeFood, &error);
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                mock_food_analysis(&mut *rng)
            }
        }
    }

    /// Posts an image (as a data URL) to `/api/recognize-gesture`.
    ///
    /// Falls back to `{gesture: "none", confidence: 0}`.
    pub async fn recognize_gesture(&self, image: &MediaBlob) -> GestureResult {
        let request = GestureRequest {
            image: image.to_data_url(),
        };
        let body = match serde_json::to_value(&request) {
            Ok(value) => RequestBody::Json(value),
            Err(error) => {
                log_fallback(Endpoint::RecognizeGesture, &error.into());
                return GestureResult::none();
            }
        };

        self.fetch_json(Endpoint::RecognizeGesture, body)
            .await
            .unwrap_or_else(|error| {
                log_fallback(Endpoint::RecognizeGesture, &error);
                GestureResult::none()
            })
    }

    /// Posts an audio clip to `/api/speech-to-text`.
    ///
    /// Falls back to a transcript carrying the failure message.
    pub async fn speech_to_text(&self, audio: &MediaBlob) -> Transcript {
        let body = RequestBody::Multipart {
            field: "audio",
            file_name: audio.upload_file_name("audio"),
            blob: audio.clone(),
        };

        self.fetch_json(Endpoint::SpeechToText, body)
            .await
            .unwrap_or_else(|error| {
                log_fallback(Endpoint::SpeechToText, &error);
                Transcript::failed()
            })
    }

    /// Posts a chat message to `/api/chat`.
    ///
    /// Falls back to a static apology with no context.
    pub async fn chat_with_ai(&self, message: &str, context: Option<Value>) -> ChatReply {
        let request = ChatRequest {
            message: message.to_string(),
            context,
        };
        let body = match serde_json::to_value(&request) {
            Ok(value) => RequestBody::Json(value),
            Err(error) => {
                log_fallback(Endpoint::Chat, &error.into());
                return ChatReply::unavailable();
            }
        };

        self.fetch_json(Endpoint::Chat, body)
            .await
            .unwrap_or_else(|error| {
                log_fallback(Endpoint::Chat, &error);
                ChatReply::unavailable()
            })
    }

    /// Posts nutrition totals to `/api/nutrition-advice`.
    ///
    /// Falls back to generic advice with no recommendations.
    pub async fn get_nutrition_advice(&self, nutrition: &Nutrition) -> NutritionAdvice {
        let body = match serde_json::to_value(nutrition) {
            Ok(value) => RequestBody::Json(value),
            Err(error) => {
                log_fallback(Endpoint::NutritionAdvice, &error.into());
                return NutritionAdvice::generic();
            }
        };

        self.fetch_json(Endpoint::NutritionAdvice, body)
            .await
            .unwrap_or_else(|error| {
                log_fallback(Endpoint::NutritionAdvice, &error);
                NutritionAdvice::generic()
            })
    }

    /// Returns `true` when `GET /api/health` answers 2xx.
    pub async fn health_check(&self) -> bool {
        match self.fetch(Endpoint::Health, RequestBody::Empty).await {
            Ok(_) => true,
            Err(error) => {
                warn!(
                    stage = "api",
                    action = "health",
                    failure = error.kind(),
                    error = %error,
                    "health check failed"
                );
                false
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: RequestBody,
    ) -> Result<T, ApiError> {
        let response = self.fetch(endpoint, body).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn fetch(&self, endpoint: Endpoint, body: RequestBody) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest {
            method: endpoint.method(),
            url: self.endpoint_url(endpoint)?,
            body,
        };

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::Status(response.status));
        }

        debug!(
            stage = "api",
            action = endpoint.name(),
            status = response.status,
            bytes = response.body.len(),
            "backend responded"
        );
        Ok(response)
    }
}

#[async_trait]
impl FoodAnalyzer for ApiClient {
    async fn analyze_food(&self, image: &MediaBlob) -> AnalysisResult {
        ApiClient::analyze_food(self, image).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn log_fallback(endpoint: Endpoint, error: &ApiError) {
    warn!(
        stage = "api",
        action = endpoint.name(),
        failure = error.kind(),
        error = %error,
        "backend call failed; using local substitute"
    );
}

#[cfg(test)]
mod tests {
    //! Unit tests for URL resolution.

    use super::*;

    struct NeverTransport;

    #[async_trait]
    impl ApiTransport for NeverTransport {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
            Err(ApiError::Transport("unused".to_string()))
        }
    }

    #[test]
    fn endpoints_resolve_under_base_path() {
        let client = ApiClient::new("http://localhost:8000/food", Arc::new(NeverTransport))
            .expect("client should build");
        let url = client
            .endpoint_url(Endpoint::AnalyzeFood)
            .expect("endpoint should resolve");
        assert_eq!(url.as_str(), "http://localhost:8000/food/api/analyze-food");
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(matches!(
            ApiClient::new("ftp://example.test", Arc::new(NeverTransport)),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(ApiClient::new("not a url", Arc::new(NeverTransport)).is_err());
    }

    #[test]
    fn health_is_the_only_get_endpoint() {
        assert_eq!(Endpoint::Health.method(), HttpMethod::Get);
        assert_eq!(Endpoint::Chat.method(), HttpMethod::Post);
    }
}
