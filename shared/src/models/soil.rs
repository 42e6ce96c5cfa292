//! Soil image classification models

use serde::{Deserialize, Serialize};

/// Soil types the classifier is allowed to report
pub const SOIL_TYPES: [&str; 8] = [
    "Sandy Soil",
    "Clayey Soil",
    "Loamy Soil",
    "Silt Soil",
    "Peat Soil",
    "Black Soil",
    "Red Soil",
    "Alluvial Soil",
];

/// Label used for anything outside [`SOIL_TYPES`]
pub const UNKNOWN_SOIL_TYPE: &str = "Unknown";

/// Result of classifying a soil photograph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilClassification {
    pub soil_type: String,
    /// Confidence from 0 to 1
    pub confidence: f64,
    /// Failure text on fallback results, empty for model answers
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Map a model-reported soil type onto the known list.
///
/// Matching ignores case and surrounding whitespace, and accepts the bare
/// name without the "Soil" suffix ("loamy" → "Loamy Soil").
pub fn normalize_soil_type(reported: &str) -> &'static str {
    let wanted = reported.trim().to_ascii_lowercase();
    SOIL_TYPES
        .iter()
        .find(|known| {
            let known = known.to_ascii_lowercase();
            known == wanted || known.trim_end_matches(" soil") == wanted
        })
        .copied()
        .unwrap_or(UNKNOWN_SOIL_TYPE)
}
