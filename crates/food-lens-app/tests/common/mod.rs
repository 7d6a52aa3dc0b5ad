//! Shared fixtures for controller integration tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use food_lens_api::FoodAnalyzer;
use food_lens_app::{CaptureController, Clock};
use food_lens_capture::SyntheticCamera;
use food_lens_core::{AnalysisResult, FoodItem, MediaBlob, Nutrition};
use time::OffsetDateTime;

/// Analyser that returns a fixed result and records what it was given.
#[derive(Debug, Default)]
pub struct StubAnalyzer {
    calls: AtomicUsize,
    mime_types: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubAnalyzer {
    /// Number of `analyze_food` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// MIME types of analysed blobs, in call order.
    pub fn mime_types(&self) -> Vec<String> {
        self.mime_types.lock().expect("mime log lock should work").clone()
    }
}

#[async_trait]
impl FoodAnalyzer for StubAnalyzer {
    async fn analyze_food(&self, image: &MediaBlob) -> AnalysisResult {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.mime_types
            .lock()
            .expect("mime log lock should work")
            .push(image.mime_type.clone());
        stub_result(call as f64 * 100.0)
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now_ms: AtomicU64,
}

#[allow(dead_code)]
impl FixedClock {
    /// Starts at `start_ms` epoch milliseconds.
    pub fn at(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, millis: u64) {
        self.now_ms.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        let nanos = i128::from(self.now_ms.load(Ordering::SeqCst)) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).expect("fixture time should be in range")
    }
}

/// Result whose calories identify the call that produced it.
pub fn stub_result(calories: f64) -> AnalysisResult {
    AnalysisResult {
        foods: vec![FoodItem {
            name: "Rice".to_string(),
            confidence: 0.95,
        }],
        nutrition: Nutrition {
            calories,
            protein: 4.3,
            carbs: 45.0,
            fat: 0.4,
        },
        advice: "Stub advice.".to_string(),
    }
}

/// Minimal PNG-typed upload.
#[allow(dead_code)]
pub fn image_upload() -> MediaBlob {
    MediaBlob::new("image/png", vec![0x89, 0x50, 0x4E, 0x47])
        .expect("fixture blob should be valid")
        .with_file_name("plate.png")
}

/// Non-image upload.
#[allow(dead_code)]
pub fn text_upload() -> MediaBlob {
    MediaBlob::new("text/plain", b"not a meal".to_vec())
        .expect("fixture blob should be valid")
        .with_file_name("notes.txt")
}

/// Controller wired to fixtures, with handles for assertions.
#[allow(dead_code)]
pub struct Harness {
    pub controller: CaptureController,
    pub camera: Arc<SyntheticCamera>,
    pub analyzer: Arc<StubAnalyzer>,
    pub clock: Arc<FixedClock>,
}

/// Builds a controller over `camera` with a stub analyser and fixed clock.
#[allow(dead_code)]
pub fn harness(camera: SyntheticCamera) -> Harness {
    let camera = Arc::new(camera);
    let analyzer = Arc::new(StubAnalyzer::default());
    let clock = Arc::new(FixedClock::at(1_700_000_000_000));
    let controller = CaptureController::new(camera.clone(), analyzer.clone(), clock.clone());
    Harness {
        controller,
        camera,
        analyzer,
        clock,
    }
}
