#![warn(missing_docs)]
//! # food-lens-ui
//!
//! ## Purpose
//! Defines the UI-facing state model and the pure rendering functions for
//! `food-lens`.
//!
//! ## Responsibilities
//! - Map [`AnalysisResult`] to [`AnalysisView`] and history to list items.
//! - Represent camera affordances, image preview, and results panel state.
//! - Keep transient toasts with a fixed lifetime.
//!
//! ## Data flow
//! Controller events mutate [`UiState`]; any shell (terminal, webview,
//! native window) draws from it.
//!
//! ## Ownership and lifetimes
//! `UiState` owns all strings so reducers never borrow from results or blobs.
//!
//! ## Error model
//! Rendering is total: missing data falls back to placeholder text.

use std::fmt;

use food_lens_analysis_contract::DEFAULT_ADVICE;
use food_lens_core::{AnalysisHistory, AnalysisResult, HistoryEntry, MediaBlob};
use time::macros::format_description;

/// How long a toast stays on screen.
pub const TOAST_LIFETIME_MS: u64 = 3_000;

/// Label shown while no food is recognised.
pub const NO_FOOD_LABEL: &str = "No food recognized";

/// History label for an entry without foods.
pub const UNRECOGNIZED_LABEL: &str = "Unrecognized";

/// Results panel text before the first analysis.
pub const NO_ANALYSIS_LABEL: &str = "No analysis yet";

/// Loading indicator text.
pub const ANALYZING_LABEL: &str = "Analyzing food...";

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Completed action.
    Success,
    /// Rejected action.
    Error,
    /// Degraded but continuing.
    Warning,
    /// Neutral notice.
    Info,
}

impl ToastKind {
    /// Background colour used by graphical shells.
    pub fn color(self) -> &'static str {
        match self {
            ToastKind::Success => "#10b981",
            ToastKind::Error => "#ef4444",
            ToastKind::Warning => "#f59e0b",
            ToastKind::Info => "#3b82f6",
        }
    }
}

/// One transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity.
    pub kind: ToastKind,
    /// Message text.
    pub text: String,
    /// When the toast appeared, epoch milliseconds.
    pub shown_at_ms: u64,
}

impl Toast {
    /// Returns `true` once [`TOAST_LIFETIME_MS`] has elapsed.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.shown_at_ms) >= TOAST_LIFETIME_MS
    }
}

/// Visible toasts, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastTray {
    toasts: Vec<Toast>,
}

impl ToastTray {
    /// Shows a new toast.
    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>, now_ms: u64) {
        self.toasts.push(Toast {
            kind,
            text: text.into(),
            shown_at_ms: now_ms,
        });
    }

    /// Drops expired toasts and returns how many were removed.
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| !toast.is_expired(now_ms));
        before - self.toasts.len()
    }

    /// Toasts currently on screen.
    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    /// Most recent toast.
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Returns `true` if any visible toast has `kind`.
    pub fn contains_kind(&self, kind: ToastKind) -> bool {
        self.toasts.iter().any(|toast| toast.kind == kind)
    }
}

/// Camera button state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraControls {
    /// Label of the toggle button.
    pub toggle_label: String,
    /// Whether the capture button is shown.
    pub capture_visible: bool,
    /// Whether the close button is shown.
    pub close_visible: bool,
    /// Whether the live preview surface is shown.
    pub preview_visible: bool,
}

impl CameraControls {
    /// Affordances with no active stream.
    pub fn closed() -> Self {
        Self {
            toggle_label: "Open camera".to_string(),
            capture_visible: false,
            close_visible: false,
            preview_visible: false,
        }
    }

    /// Affordances while a stream is attached.
    pub fn open() -> Self {
        Self {
            toggle_label: "Close camera".to_string(),
            capture_visible: true,
            close_visible: true,
            preview_visible: true,
        }
    }
}

/// Still image shown next to the results.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePreview {
    /// Image as a `data:` URL.
    pub data_url: String,
    /// Encoded size in bytes.
    pub byte_len: usize,
}

impl ImagePreview {
    /// Builds a preview from an image blob.
    pub fn from_blob(blob: &MediaBlob) -> Self {
        Self {
            data_url: blob.to_data_url(),
            byte_len: blob.len(),
        }
    }
}

impl fmt::Debug for ImagePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePreview")
            .field("byte_len", &self.byte_len)
            .finish()
    }
}

/// Rendered food row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodItemView {
    /// Food name.
    pub name: String,
    /// Confidence as a percentage with one decimal, e.g. `95.0%`.
    pub confidence: String,
}

/// Rendered nutrition row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionRow {
    /// Row label.
    pub label: &'static str,
    /// Value with unit.
    pub value: String,
}

/// View-model of one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisView {
    /// Recognised foods.
    pub foods: Vec<FoodItemView>,
    /// Placeholder shown instead of an empty food list.
    pub empty_foods_label: Option<&'static str>,
    /// Calories, protein, carbs, fat, in that order.
    pub nutrition: Vec<NutritionRow>,
    /// Advice paragraph.
    pub advice: String,
}

impl fmt::Display for AnalysisView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Foods")?;
        if let Some(label) = self.empty_foods_label {
            writeln!(f, "  {label}")?;
        }
        for food in &self.foods {
            writeln!(f, "  {:<20} {}", food.name, food.confidence)?;
        }

        writeln!(f, "Nutrition")?;
        for row in &self.nutrition {
            writeln!(f, "  {:<20} {}", row.label, row.value)?;
        }

        writeln!(f, "Advice")?;
        write!(f, "  {}", self.advice)
    }
}

/// Rendered history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItemView {
    /// Local-format timestamp.
    pub timestamp: String,
    /// Calories with unit.
    pub calories: String,
    /// Comma-separated food names.
    pub foods: String,
}

/// Results panel state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultsPanel {
    /// Nothing analysed yet.
    #[default]
    Empty,
    /// Request in flight.
    Loading,
    /// Last analysis.
    Ready(AnalysisView),
}

impl fmt::Display for ResultsPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsPanel::Empty => f.write_str(NO_ANALYSIS_LABEL),
            ResultsPanel::Loading => f.write_str(ANALYZING_LABEL),
            ResultsPanel::Ready(view) => view.fmt(f),
        }
    }
}

/// Gesture recognition toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GestureStatus {
    /// Recognition running.
    Enabled,
    /// Recognition off.
    #[default]
    Disabled,
}

impl GestureStatus {
    /// Status label.
    pub fn label(self) -> &'static str {
        match self {
            GestureStatus::Enabled => "Enabled",
            GestureStatus::Disabled => "Disabled",
        }
    }
}

/// Aggregate UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// App version string.
    pub version: String,
    /// Camera affordances.
    pub camera: CameraControls,
    /// Last previewed image.
    pub preview: Option<ImagePreview>,
    /// Results panel.
    pub results: ResultsPanel,
    /// History rows, newest first.
    pub history: Vec<HistoryItemView>,
    /// Transient messages.
    pub toasts: ToastTray,
    /// Gesture recognition status.
    pub gesture: GestureStatus,
}

impl UiState {
    /// Creates the initial UI state.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            camera: CameraControls::closed(),
            preview: None,
            results: ResultsPanel::Empty,
            history: Vec::new(),
            toasts: ToastTray::default(),
            gesture: GestureStatus::Disabled,
        }
    }

    /// Returns `true` while the loading indicator is shown.
    pub fn is_loading(&self) -> bool {
        self.results == ResultsPanel::Loading
    }
}

/// Maps an analysis to its view-model.
pub fn render_analysis(result: &AnalysisResult) -> AnalysisView {
    let foods: Vec<FoodItemView> = result
        .foods
        .iter()
        .map(|food| FoodItemView {
            name: food.name.clone(),
            confidence: format!("{:.1}%", f64::from(food.confidence) * 100.0),
        })
        .collect();

    let nutrition = &result.nutrition;
    let advice = if result.advice.trim().is_empty() {
        DEFAULT_ADVICE.to_string()
    } else {
        result.advice.clone()
    };

    AnalysisView {
        empty_foods_label: foods.is_empty().then_some(NO_FOOD_LABEL),
        foods,
        nutrition: vec![
            NutritionRow {
                label: "Calories",
                value: format!("{} kcal", nutrition.calories),
            },
            NutritionRow {
                label: "Protein",
                value: format!("{}g", nutrition.protein),
            },
            NutritionRow {
                label: "Carbohydrates",
                value: format!("{}g", nutrition.carbs),
            },
            NutritionRow {
                label: "Fat",
                value: format!("{}g", nutrition.fat),
            },
        ],
        advice,
    }
}

/// Maps one history entry to its row.
pub fn render_history_entry(entry: &HistoryEntry) -> HistoryItemView {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let timestamp = entry
        .recorded_at
        .format(format)
        .unwrap_or_else(|_| entry.recorded_at.to_string());

    let foods = if entry.food_names.is_empty() {
        UNRECOGNIZED_LABEL.to_string()
    } else {
        entry.food_names.join(", ")
    };

    HistoryItemView {
        timestamp,
        calories: format!("{} kcal", entry.calories),
        foods,
    }
}

/// Maps the whole history, newest first.
pub fn render_history(history: &AnalysisHistory) -> Vec<HistoryItemView> {
    history.iter().map(render_history_entry).collect()
}

/// Text report for one upload or capture, headed by `source`.
///
/// A rejected action reports only the latest toast; the results panel still
/// holds the previous analysis and is left out.
pub fn render_outcome(source: &str, accepted: bool, ui: &UiState) -> String {
    let mut report = format!("== {source}\n");
    if accepted {
        report.push_str(&ui.results.to_string());
        report.push('\n');
    }
    if let Some(toast) = ui.toasts.latest() {
        report.push_str(&format!("[{:?}] {}\n", toast.kind, toast.text));
    }
    report
}
