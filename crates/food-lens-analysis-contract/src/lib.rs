#![warn(missing_docs)]
//! # food-lens-analysis-contract
//!
//! ## Purpose
//! Defines the backend response contracts and the local stand-ins used when
//! the backend cannot answer.
//!
//! ## Responsibilities
//! - Parse food analysis responses and reject values outside their ranges.
//! - Describe request/response bodies of the auxiliary AI endpoints.
//! - Generate mock food analyses from a fixed food table.
//! - Derive rule-based nutrition advice from meal totals.
//!
//! ## Data flow
//! Raw JSON response -> [`parse_analysis_result`] -> controller rendering.
//! On failure: RNG -> [`mock_food_analysis`] -> [`nutrition_advice`].
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs; nothing borrows from response buffers.
//!
//! ## Error model
//! Invalid JSON or out-of-range values return [`AnalysisContractError`].
//!
//! ## Security and privacy notes
//! Only model outputs pass through here; no media bytes.

use food_lens_core::{AnalysisResult, FoodItem, Nutrition};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Advice fragment for meals under [`LOW_CALORIE_THRESHOLD`].
pub const LOW_CALORIE_ADVICE: &str =
    "Calories are on the low side; consider adding some healthy carbohydrates.";
/// Advice fragment for meals over [`HIGH_CALORIE_THRESHOLD`].
pub const HIGH_CALORIE_ADVICE: &str = "Calories are on the high side; watch the portion size.";
/// Advice fragment for meals under [`LOW_PROTEIN_THRESHOLD`].
pub const LOW_PROTEIN_ADVICE: &str =
    "Protein is on the low side; consider adding eggs, tofu, or lean meat.";
/// Advice fragment for meals over [`HIGH_FAT_THRESHOLD`].
pub const HIGH_FAT_ADVICE: &str = "Fat is on the high side; consider a lighter cooking method.";
/// Advice when no rule fires.
pub const BALANCED_ADVICE: &str =
    "This meal is well balanced; keep up the healthy eating habits.";
/// Advice shown when a result carries no advice text.
pub const DEFAULT_ADVICE: &str =
    "Eat a balanced diet, exercise moderately, and keep a healthy lifestyle.";

/// Calories below this trigger [`LOW_CALORIE_ADVICE`].
pub const LOW_CALORIE_THRESHOLD: f64 = 200.0;
/// Calories above this trigger [`HIGH_CALORIE_ADVICE`].
pub const HIGH_CALORIE_THRESHOLD: f64 = 600.0;
/// Protein grams below this trigger [`LOW_PROTEIN_ADVICE`].
pub const LOW_PROTEIN_THRESHOLD: f64 = 10.0;
/// Fat grams above this trigger [`HIGH_FAT_ADVICE`].
pub const HIGH_FAT_THRESHOLD: f64 = 20.0;

/// Gesture label used when recognition is unavailable.
pub const NO_GESTURE: &str = "none";
/// Transcript text used when speech recognition is unavailable.
pub const SPEECH_FAILED_TEXT: &str = "Speech recognition failed";
/// Chat reply used when the assistant is unavailable.
pub const CHAT_UNAVAILABLE_REPLY: &str =
    "Sorry, the AI service is temporarily unavailable. Please try again later.";
/// Advice used when the nutrition advice service is unavailable.
pub const GENERIC_NUTRITION_ADVICE: &str =
    "Keep a balanced diet and exercise in moderation.";

/// One row of the fixed mock food table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockFood {
    /// Food name.
    pub name: &'static str,
    /// Pretend recognition confidence.
    pub confidence: f32,
    /// Per-serving nutrition.
    pub nutrition: Nutrition,
}

/// Foods the mock analyser picks from.
pub const MOCK_FOOD_TABLE: [MockFood; 4] = [
    MockFood {
        name: "Rice",
        confidence: 0.95,
        nutrition: Nutrition {
            calories: 130.0,
            protein: 2.7,
            carbs: 28.0,
            fat: 0.3,
        },
    },
    MockFood {
        name: "Greens",
        confidence: 0.88,
        nutrition: Nutrition {
            calories: 15.0,
            protein: 1.5,
            carbs: 3.0,
            fat: 0.2,
        },
    },
    MockFood {
        name: "Egg",
        confidence: 0.92,
        nutrition: Nutrition {
            calories: 155.0,
            protein: 13.0,
            carbs: 1.1,
            fat: 11.0,
        },
    },
    MockFood {
        name: "Tofu",
        confidence: 0.85,
        nutrition: Nutrition {
            calories: 76.0,
            protein: 8.0,
            carbs: 1.9,
            fat: 4.8,
        },
    },
];

/// Most foods one mock analysis reports.
pub const MAX_MOCK_FOODS: usize = 3;

/// Body of `POST /api/recognize-gesture`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureRequest {
    /// Encoded image, as a `data:` URL.
    pub image: String,
}

/// Response of `POST /api/recognize-gesture`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureResult {
    /// Recognised gesture label.
    pub gesture: String,
    /// Confidence in [0.0, 1.0].
    #[serde(default)]
    pub confidence: f32,
}

impl GestureResult {
    /// Stand-in reporting no gesture.
    pub fn none() -> Self {
        Self {
            gesture: NO_GESTURE.to_string(),
            confidence: 0.0,
        }
    }
}

/// Response of `POST /api/speech-to-text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Recognised text.
    pub text: String,
    /// Confidence in [0.0, 1.0].
    #[serde(default)]
    pub confidence: f32,
}

impl Transcript {
    /// Stand-in carrying the failure message.
    pub fn failed() -> Self {
        Self {
            text: SPEECH_FAILED_TEXT.to_string(),
            confidence: 0.0,
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message.
    pub message: String,
    /// Opaque conversation context returned by a previous reply.
    pub context: Option<Value>,
}

/// Response of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant reply text.
    pub response: String,
    /// Context to send with the next message.
    #[serde(default)]
    pub context: Option<Value>,
}

impl ChatReply {
    /// Stand-in apology with no context.
    pub fn unavailable() -> Self {
        Self {
            response: CHAT_UNAVAILABLE_REPLY.to_string(),
            context: None,
        }
    }
}

/// Response of `POST /api/nutrition-advice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionAdvice {
    /// Summary advice.
    pub advice: String,
    /// Concrete recommendations.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl NutritionAdvice {
    /// Stand-in generic advice.
    pub fn generic() -> Self {
        Self {
            advice: GENERIC_NUTRITION_ADVICE.to_string(),
            recommendations: Vec::new(),
        }
    }
}

/// Parses and validates a food analysis response.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON.
/// Returns [`AnalysisContractError::InvalidContract`] when a confidence lies
/// outside [0, 1], a food name is blank, or a nutrition value is negative or
/// not finite.
pub fn parse_analysis_result(raw: &str) -> Result<AnalysisResult, AnalysisContractError> {
    let parsed: AnalysisResult = serde_json::from_str(raw)?;
    validate_analysis_result(&parsed)?;
    Ok(parsed)
}

/// Checks contract invariants of an already-decoded result.
///
/// # Errors
/// See [`parse_analysis_result`].
pub fn validate_analysis_result(result: &AnalysisResult) -> Result<(), AnalysisContractError> {
    for food in &result.foods {
        if food.name.trim().is_empty() {
            return Err(AnalysisContractError::InvalidContract(
                "food name is empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&food.confidence) {
            return Err(AnalysisContractError::InvalidContract(format!(
                "confidence {} for '{}' is outside [0, 1]",
                food.confidence, food.name
            )));
        }
    }

    let nutrition = &result.nutrition;
    for (field, value) in [
        ("calories", nutrition.calories),
        ("protein", nutrition.protein),
        ("carbs", nutrition.carbs),
        ("fat", nutrition.fat),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(AnalysisContractError::InvalidContract(format!(
                "nutrition.{field} must be a non-negative number, got {value}"
            )));
        }
    }

    Ok(())
}

/// Builds a stand-in analysis from 1 to [`MAX_MOCK_FOODS`] random table rows.
///
/// Calories are rounded to whole kcal and macros to one decimal. Advice is
/// derived from the unrounded sums.
pub fn mock_food_analysis<R: Rng>(rng: &mut R) -> AnalysisResult {
    let mut table = MOCK_FOOD_TABLE;
    table.shuffle(rng);
    let count = rng.random_range(1..=MAX_MOCK_FOODS);
    let picked = &table[..count];

    let totals: Nutrition = picked.iter().map(|food| food.nutrition).sum();

    AnalysisResult {
        foods: picked
            .iter()
            .map(|food| FoodItem {
                name: food.name.to_string(),
                confidence: food.confidence,
            })
            .collect(),
        nutrition: Nutrition {
            calories: totals.calories.round(),
            protein: round_to_tenth(totals.protein),
            carbs: round_to_tenth(totals.carbs),
            fat: round_to_tenth(totals.fat),
        },
        advice: nutrition_advice(&totals),
    }
}

/// Derives advice from meal totals.
///
/// Every applicable rule contributes its fragment in a fixed order
/// (calories, protein, fat), joined by single spaces. With no applicable
/// rule the result is [`BALANCED_ADVICE`].
pub fn nutrition_advice(totals: &Nutrition) -> String {
    let mut fragments = Vec::new();

    if totals.calories < LOW_CALORIE_THRESHOLD {
        fragments.push(LOW_CALORIE_ADVICE);
    } else if totals.calories > HIGH_CALORIE_THRESHOLD {
        fragments.push(HIGH_CALORIE_ADVICE);
    }

    if totals.protein < LOW_PROTEIN_THRESHOLD {
        fragments.push(LOW_PROTEIN_ADVICE);
    }

    if totals.fat > HIGH_FAT_THRESHOLD {
        fragments.push(HIGH_FAT_ADVICE);
    }

    if fragments.is_empty() {
        return BALANCED_ADVICE.to_string();
    }
    fragments.join(" ")
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("analysis contract violation: {0}")]
    InvalidContract(String),
}
