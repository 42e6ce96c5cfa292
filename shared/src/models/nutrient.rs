//! Nutrient plan models

use serde::{Deserialize, Serialize};

/// A single fertilizer application within a nutrient plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerRecommendation {
    /// Fertilizer product, e.g. "Urea" or "Compost (Organic)"
    pub fertilizer_type: String,
    /// Growth stage for the application, e.g. "Planting"
    pub application_stage: String,
    pub quantity_per_acre_kg: f64,
    pub notes: String,
}

/// Ordered fertilizer applications covering the growth stages of one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientPlan {
    pub plan_details: Vec<FertilizerRecommendation>,
}
