//! Crop recommendation models

use serde::{Deserialize, Serialize};

/// A single crop suggestion produced by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub crop_name: String,
    /// Explanation referencing the soil type and sensor readings
    pub reasoning: String,
    /// Suitability from 0 (unsuitable) to 1 (ideal)
    pub suitability_score: f64,
}

/// Ordered set of crop recommendations, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendationSet {
    pub recommendations: Vec<CropRecommendation>,
}
