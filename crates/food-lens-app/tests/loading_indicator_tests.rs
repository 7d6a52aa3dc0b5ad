//! Integration tests for UI snapshots published while analysis is pending.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{FixedClock, image_upload, stub_result};
use food_lens_api::FoodAnalyzer;
use food_lens_app::CaptureController;
use food_lens_capture::SyntheticCamera;
use food_lens_core::{AnalysisResult, MediaBlob};
use food_lens_ui::ResultsPanel;
use tokio::sync::Notify;

/// Analyser that answers only after the gate is opened.
#[derive(Default)]
struct GatedAnalyzer {
    gate: Notify,
}

#[async_trait]
impl FoodAnalyzer for GatedAnalyzer {
    async fn analyze_food(&self, _image: &MediaBlob) -> AnalysisResult {
        self.gate.notified().await;
        stub_result(250.0)
    }
}

#[tokio::test]
async fn loading_indicator_tests_shows_loading_while_analysis_is_pending() {
    let analyzer = Arc::new(GatedAnalyzer::default());
    let mut controller = CaptureController::new(
        Arc::new(SyntheticCamera::new()),
        analyzer.clone(),
        Arc::new(FixedClock::at(0)),
    );
    let mut updates = controller.subscribe();
    assert_eq!(updates.borrow().results, ResultsPanel::Empty);

    let observer = async {
        let pending = updates
            .wait_for(|ui| ui.results == ResultsPanel::Loading)
            .await
            .expect("controller should stay alive")
            .clone();
        analyzer.gate.notify_one();
        pending
    };

    let (result, pending) = tokio::join!(controller.handle_file_upload(image_upload()), observer);

    assert!(pending.preview.is_some());
    assert!(pending.history.is_empty());
    let result = result.expect("image upload should be analysed");
    assert_eq!(result.nutrition.calories, 250.0);

    let settled = controller.subscribe().borrow().clone();
    assert!(matches!(settled.results, ResultsPanel::Ready(_)));
    assert_eq!(settled.history.len(), 1);
    assert_eq!(&settled, controller.ui());
}

#[tokio::test]
async fn loading_indicator_tests_publishes_rejections() {
    let analyzer = Arc::new(GatedAnalyzer::default());
    let mut controller = CaptureController::new(
        Arc::new(SyntheticCamera::denied()),
        analyzer,
        Arc::new(FixedClock::at(0)),
    );
    let updates = controller.subscribe();

    controller.toggle_camera();

    assert!(updates.has_changed().expect("controller should stay alive"));
    assert_eq!(updates.borrow().toasts.visible().len(), 1);
}
