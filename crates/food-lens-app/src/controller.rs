//! Camera/upload controller.

use std::sync::Arc;

use food_lens_api::FoodAnalyzer;
use food_lens_capture::{CameraDevice, CameraSession, CaptureError, VideoConstraints};
use food_lens_core::{AnalysisHistory, AnalysisResult, CoreError, HistoryEntry, MediaBlob};
use food_lens_ui::{
    CameraControls, GestureStatus, ImagePreview, ResultsPanel, ToastKind, UiState,
    render_analysis, render_history,
};
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{error, info};

/// Source of wall-clock time for history stamps and toast expiry.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> OffsetDateTime;

    /// Current time in Unix epoch milliseconds.
    fn now_ms(&self) -> u64 {
        let nanos = self.now().unix_timestamp_nanos();
        u64::try_from(nanos / 1_000_000).unwrap_or(0)
    }
}

/// Clock backed by the system time in the local offset when available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// Camera state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// A stream is attached.
    Open,
    /// No stream is attached.
    Closed,
}

/// Failures surfaced to the user as error toasts.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Camera could not be opened.
    #[error("camera access failed: {0}")]
    CameraAccess(#[source] CaptureError),
    /// Capture requested with no stream attached.
    #[error("no active camera stream")]
    NoActiveStream,
    /// Upload is not an image.
    #[error("upload rejected: {0}")]
    InvalidUpload(#[source] CoreError),
    /// Frame grab or encoding failed.
    #[error("capture failed: {0}")]
    Capture(#[source] CaptureError),
}

impl ControllerError {
    /// Text shown in the error toast.
    pub fn user_message(&self) -> &'static str {
        match self {
            ControllerError::CameraAccess(_) => {
                "Unable to access the camera, check permission settings"
            }
            ControllerError::NoActiveStream => "Open the camera first",
            ControllerError::InvalidUpload(_) => "Please choose an image file",
            ControllerError::Capture(_) => "Image capture failed",
        }
    }
}

/// Owns the camera session, history, and UI state of one page.
///
/// Handlers take `&mut self`, so a shell cannot read [`CaptureController::ui`]
/// while one is awaiting the analyser. Shells that redraw during a request
/// watch [`CaptureController::subscribe`] instead; every state change is
/// published there, including the loading panel.
pub struct CaptureController {
    camera: Arc<dyn CameraDevice>,
    analyzer: Arc<dyn FoodAnalyzer>,
    clock: Arc<dyn Clock>,
    constraints: VideoConstraints,
    session: Option<CameraSession>,
    history: AnalysisHistory,
    ui: UiState,
    updates: watch::Sender<UiState>,
}

impl CaptureController {
    /// Creates a controller requesting the default 640x480 video-only stream.
    pub fn new(
        camera: Arc<dyn CameraDevice>,
        analyzer: Arc<dyn FoodAnalyzer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ui = UiState::new(crate::app_version());
        let (updates, _) = watch::channel(ui.clone());
        Self {
            camera,
            analyzer,
            clock,
            constraints: VideoConstraints::default(),
            session: None,
            history: AnalysisHistory::default(),
            ui,
            updates,
        }
    }

    /// Receiver of UI snapshots, updated after every state change.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.updates.subscribe()
    }

    /// Current UI state.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Analysis history, newest first.
    pub fn history(&self) -> &AnalysisHistory {
        &self.history
    }

    /// Returns `true` while a camera stream is attached.
    pub fn camera_active(&self) -> bool {
        self.session.is_some()
    }

    /// Opens the camera, or closes it when a stream is already attached.
    pub fn toggle_camera(&mut self) -> CameraState {
        if self.session.is_some() {
            self.close_camera();
            return CameraState::Closed;
        }

        match CameraSession::open(self.camera.as_ref(), self.constraints) {
            Ok(session) => {
                self.session = Some(session);
                self.ui.camera = CameraControls::open();
                self.toast(ToastKind::Success, "Camera opened");
                self.publish();
                info!(stage = "camera", action = "open", "camera stream opened");
                CameraState::Open
            }
            Err(source) => {
                self.report(ControllerError::CameraAccess(source));
                CameraState::Closed
            }
        }
    }

    /// Stops the stream and resets camera affordances. Safe without a stream.
    pub fn close_camera(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
            info!(stage = "camera", action = "close", "camera stream closed");
        }
        self.ui.camera = CameraControls::closed();
        self.publish();
    }

    /// Validates, previews, and analyses a user-selected file.
    ///
    /// Returns `None` when the file was rejected.
    pub async fn handle_file_upload(&mut self, file: MediaBlob) -> Option<AnalysisResult> {
        if let Err(source) = file.ensure_image() {
            self.report(ControllerError::InvalidUpload(source));
            return None;
        }

        info!(
            stage = "upload",
            action = "accepted",
            mime = %file.mime_type,
            bytes = file.len(),
            "image upload accepted"
        );
        self.ui.preview = Some(ImagePreview::from_blob(&file));
        self.publish();
        Some(self.analyze_food(file).await)
    }

    /// Grabs the current frame as JPEG, previews it, and analyses it.
    ///
    /// Returns `None` when no stream is attached or the capture failed.
    pub async fn capture_image(&mut self) -> Option<AnalysisResult> {
        let frame = match self.grab_frame() {
            Ok(frame) => frame,
            Err(failure) => {
                self.report(failure);
                return None;
            }
        };

        self.ui.preview = Some(ImagePreview::from_blob(&frame));
        self.toast(ToastKind::Success, "Image captured, analyzing...");
        self.publish();
        Some(self.analyze_food(frame).await)
    }

    /// Shows the loading panel, awaits the analyser, then renders the result
    /// and records it in history.
    pub async fn analyze_food(&mut self, image: MediaBlob) -> AnalysisResult {
        self.ui.results = ResultsPanel::Loading;
        self.publish();

        let result = self.analyzer.analyze_food(&image).await;

        self.ui.results = ResultsPanel::Ready(render_analysis(&result));
        let evicted = self
            .history
            .push(HistoryEntry::from_result(&result, self.clock.now()));
        self.ui.history = render_history(&self.history);
        self.publish();
        info!(
            stage = "analysis",
            action = "rendered",
            foods = result.foods.len(),
            calories = result.nutrition.calories,
            history = self.history.len(),
            evicted = evicted.is_some(),
            "analysis rendered"
        );
        result
    }

    /// Flips the gesture recognition status.
    pub fn toggle_gesture_recognition(&mut self, enabled: bool) {
        if enabled {
            self.ui.gesture = GestureStatus::Enabled;
            self.toast(ToastKind::Success, "Gesture recognition started");
        } else {
            self.ui.gesture = GestureStatus::Disabled;
            self.toast(ToastKind::Info, "Gesture recognition stopped");
        }
        self.publish();
        info!(stage = "gesture", action = "toggle", enabled, "gesture recognition toggled");
    }

    /// Drops toasts older than their lifetime.
    pub fn expire_toasts(&mut self) {
        let now_ms = self.clock.now_ms();
        if self.ui.toasts.expire(now_ms) > 0 {
            self.publish();
        }
    }

    fn grab_frame(&mut self) -> Result<MediaBlob, ControllerError> {
        let session = self
            .session
            .as_mut()
            .ok_or(ControllerError::NoActiveStream)?;
        session.capture_jpeg().map_err(ControllerError::Capture)
    }

    fn report(&mut self, failure: ControllerError) {
        match &failure {
            ControllerError::CameraAccess(_) | ControllerError::Capture(_) => {
                error!(stage = "controller", action = "reject", error = %failure, "device failure");
            }
            ControllerError::NoActiveStream | ControllerError::InvalidUpload(_) => {
                info!(stage = "controller", action = "reject", error = %failure, "action rejected");
            }
        }
        self.toast(ToastKind::Error, failure.user_message());
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.ui.clone());
    }

    fn toast(&mut self, kind: ToastKind, text: &str) {
        let now_ms = self.clock.now_ms();
        self.ui.toasts.expire(now_ms);
        self.ui.toasts.push(kind, text, now_ms);
    }
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("camera_active", &self.session.is_some())
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}
