#![warn(missing_docs)]
//! # food-lens-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `food-lens` workspace.
//!
//! ## Responsibilities
//! - Represent media blobs (uploaded photos, captured frames, audio clips).
//! - Represent analysis results: recognised foods, nutrition totals, advice.
//! - Keep a bounded, newest-first history of analysis summaries.
//!
//! ## Data flow
//! The controller produces a [`MediaBlob`], the API client turns it into an
//! [`AnalysisResult`], and the controller records a [`HistoryEntry`] in
//! [`AnalysisHistory`].
//!
//! ## Ownership and lifetimes
//! Blobs own their byte buffers (`Vec<u8>`) so they can cross async request
//! boundaries without borrowing from UI or device state.
//!
//! ## Error model
//! Validation failures (blank MIME type, non-image upload, zero history
//! capacity, JSON codec errors) return [`CoreError`] variants.
//!
//! ## Security and privacy notes
//! Nothing in this crate logs media bytes. Food photos stay in memory only.
//!
//! ## Example
//! ```rust
//! use food_lens_core::{AnalysisHistory, AnalysisResult, HistoryEntry};
//! use time::OffsetDateTime;
//!
//! let mut history = AnalysisHistory::default();
//! let entry = HistoryEntry::from_result(&AnalysisResult::default(), OffsetDateTime::UNIX_EPOCH);
//! assert!(history.push(entry).is_none());
//! assert_eq!(history.len(), 1);
//! ```

use std::collections::VecDeque;

use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

/// Maximum number of history entries kept per session.
pub const HISTORY_CAPACITY: usize = 10;

/// MIME prefix accepted for image uploads.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// MIME type produced by camera frame capture.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Binary media payload with its declared MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaBlob {
    /// Declared MIME type, for example `image/jpeg` or `audio/webm`.
    pub mime_type: String,
    /// Original file name when the blob came from a file picker.
    pub file_name: Option<String>,
    /// Raw encoded bytes.
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    /// Constructs a blob with a validated MIME type.
    ///
    /// # Errors
    /// Returns [`CoreError::MissingMediaType`] when `mime_type` is blank.
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CoreError> {
        let mime_type = mime_type.into().trim().to_ascii_lowercase();
        if mime_type.is_empty() {
            return Err(CoreError::MissingMediaType);
        }

        Ok(Self {
            mime_type,
            file_name: None,
            bytes,
        })
    }

    /// Attaches the originating file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Returns `true` when the MIME type is in the `image/*` family.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with(IMAGE_MIME_PREFIX)
    }

    /// Checks that this blob may be sent for food analysis.
    ///
    /// # Errors
    /// Returns [`CoreError::NotAnImage`] for non-image MIME types.
    pub fn ensure_image(&self) -> Result<(), CoreError> {
        if self.is_image() {
            Ok(())
        } else {
            Err(CoreError::NotAnImage(self.mime_type.clone()))
        }
    }

    /// Returns the file name used in multipart uploads.
    ///
    /// Blobs without a recorded name get `<stem>.<subtype>`, e.g. `image.jpeg`.
    pub fn upload_file_name(&self, stem: &str) -> String {
        if let Some(name) = &self.file_name {
            return name.clone();
        }

        let subtype = self
            .mime_type
            .split_once('/')
            .map(|(_, subtype)| subtype.split(';').next().unwrap_or(subtype).trim())
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or("bin");
        format!("{stem}.{subtype}")
    }

    /// Encodes the blob as a `data:` URL (base64).
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Returns payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the payload has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Media bytes stay out of debug output and therefore out of logs.
impl std::fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaBlob")
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One food recognised in an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Display name of the food.
    pub name: String,
    /// Recognition confidence in [0.0, 1.0].
    pub confidence: f32,
}

/// Nutrition totals for one analysed meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    /// Energy in kcal.
    #[serde(default, deserialize_with = "null_as_default")]
    pub calories: f64,
    /// Protein in grams.
    #[serde(default, deserialize_with = "null_as_default")]
    pub protein: f64,
    /// Carbohydrates in grams.
    #[serde(default, deserialize_with = "null_as_default")]
    pub carbs: f64,
    /// Fat in grams.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fat: f64,
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Nutrition>>(iter: I) -> Self {
        iter.fold(Nutrition::default(), |total, item| total + item)
    }
}

/// Structured food analysis payload.
///
/// Every field defaults when absent or `null` so partial backend responses
/// still render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Recognised foods, in backend order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub foods: Vec<FoodItem>,
    /// Summed nutrition for the whole image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub nutrition: Nutrition,
    /// Free-text dietary advice.
    #[serde(default, deserialize_with = "null_as_default")]
    pub advice: String,
}

impl AnalysisResult {
    /// Returns recognised food names in order.
    pub fn food_names(&self) -> Vec<String> {
        self.foods.iter().map(|food| food.name.clone()).collect()
    }

    /// Serializes the result to compact JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Summary of one past analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// When the analysis completed.
    pub recorded_at: OffsetDateTime,
    /// Calorie total at the time of analysis.
    pub calories: f64,
    /// Recognised food names.
    pub food_names: Vec<String>,
}

impl HistoryEntry {
    /// Snapshots calories and food names from a result.
    pub fn from_result(result: &AnalysisResult, recorded_at: OffsetDateTime) -> Self {
        Self {
            recorded_at,
            calories: result.nutrition.calories,
            food_names: result.food_names(),
        }
    }
}

/// Bounded newest-first history of analysis summaries.
#[derive(Debug, Clone)]
pub struct AnalysisHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl AnalysisHistory {
    /// Creates an empty history with the given capacity.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidHistoryCapacity`] when `capacity == 0`.
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::InvalidHistoryCapacity);
        }

        Ok(Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        })
    }

    /// Prepends an entry.
    ///
    /// # Returns
    /// The evicted oldest entry when the insert pushed the history past
    /// capacity, otherwise `None`.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            return self.entries.pop_back();
        }
        None
    }

    /// Iterates entries newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Returns the most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Returns current entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` when no analysis has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnalysisHistory {
    fn default() -> Self {
        Self {
            capacity: HISTORY_CAPACITY,
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }
}

/// Error type for core validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Blob was created without a MIME type.
    #[error("media type is empty")]
    MissingMediaType,
    /// Upload is not an `image/*` file.
    #[error("not an image: {0}")]
    NotAnImage(String),
    /// History capacity must be strictly positive.
    #[error("history capacity must be greater than zero")]
    InvalidHistoryCapacity,
    /// JSON encoding/decoding error.
    #[error("result codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
