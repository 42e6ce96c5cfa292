//! Extraction of typed advisory results from free-form model replies
//!
//! Generative models do not reliably answer with bare JSON: replies may be
//! wrapped in prose or Markdown code fences. Extraction therefore slices from
//! the first `{` to the last `}` and parses that substring strictly.
//!
//! Known limitation: the slice is a heuristic, not a brace matcher. A stray
//! `}` after the real object, or unbalanced braces inside string values,
//! produce a slice that fails to parse. That case surfaces as an
//! [`ExtractionError`] and the caller falls back; it is never repaired.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    normalize_soil_type, CropRecommendation, CropRecommendationSet, FallbackReason, Feature,
    FertilizerRecommendation, IrrigationRecommendation, IrrigationSchedule, NitrateAlert,
    NitrateStatus, NutrientPlan, RiskLevel, SoilClassification, UNKNOWN_SOIL_TYPE,
};
use crate::validation::{
    validate_confidence_percent, validate_non_negative, validate_suitability_score,
};

/// Why a model reply could not be turned into a typed result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model reply")]
    NoJsonObject,

    #[error("invalid JSON in model reply: {0}")]
    InvalidJson(String),

    #[error("unexpected response shape: {0}")]
    Schema(String),
}

/// Locate the candidate JSON object: first `{` through last `}` inclusive
pub fn locate_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Slice and strictly parse the JSON object embedded in `raw`
pub fn extract_json(raw: &str) -> Result<Value, ExtractionError> {
    let candidate = locate_json_object(raw).ok_or(ExtractionError::NoJsonObject)?;
    serde_json::from_str(candidate).map_err(|e| ExtractionError::InvalidJson(e.to_string()))
}

/// Extract a typed result of the given shape from a raw model reply
pub fn extract<S: ExpectedShape>(raw: &str, shape: &S) -> Result<S::Output, ExtractionError> {
    let value = extract_json(raw)?;
    shape.parse(value)
}

/// Deserialize a JSON value, reporting missing or mistyped keys as schema errors
fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ExtractionError> {
    serde_json::from_value(value).map_err(|e| ExtractionError::Schema(e.to_string()))
}

fn check(field: &str, index: usize, result: Result<(), &'static str>) -> Result<(), ExtractionError> {
    result.map_err(|msg| ExtractionError::Schema(format!("{}[{}]: {}", field, index, msg)))
}

fn require_items<T>(field: &str, items: &[T]) -> Result<(), ExtractionError> {
    if items.is_empty() {
        return Err(ExtractionError::Schema(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// The documented JSON contract of one advisory feature.
///
/// A shape knows how to turn the parsed reply into its domain value and
/// which placeholder to hand out when that fails.
pub trait ExpectedShape {
    type Output;

    fn feature(&self) -> Feature;

    /// Convert the parsed JSON object, rejecting missing keys, wrong types and
    /// out-of-range values
    fn parse(&self, value: Value) -> Result<Self::Output, ExtractionError>;

    /// Well-formed, non-empty placeholder whose text names the failure
    fn fallback(&self, reason: &FallbackReason) -> Self::Output;
}

// ============================================================================
// Crop Recommendation
// ============================================================================

/// `{"recommendations": [{"crop_name", "reasoning", "suitability_score"}, ...]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct CropRecommendationShape;

impl ExpectedShape for CropRecommendationShape {
    type Output = CropRecommendationSet;

    fn feature(&self) -> Feature {
        Feature::CropRecommendation
    }

    fn parse(&self, value: Value) -> Result<Self::Output, ExtractionError> {
        let set: CropRecommendationSet = from_value(value)?;
        require_items("recommendations", &set.recommendations)?;
        for (i, rec) in set.recommendations.iter().enumerate() {
            check(
                "recommendations",
                i,
                validate_suitability_score(rec.suitability_score),
            )?;
        }
        Ok(set)
    }

    fn fallback(&self, reason: &FallbackReason) -> Self::Output {
        CropRecommendationSet {
            recommendations: vec![CropRecommendation {
                crop_name: "Error".to_string(),
                reasoning: reason.message(self.feature()),
                suitability_score: 0.0,
            }],
        }
    }
}

// ============================================================================
// Nutrient Plan
// ============================================================================

/// `{"plan_details": [{"fertilizer_type", "application_stage", "quantity_per_acre_kg", "notes"}, ...]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct NutrientPlanShape;

impl ExpectedShape for NutrientPlanShape {
    type Output = NutrientPlan;

    fn feature(&self) -> Feature {
        Feature::NutrientPlan
    }

    fn parse(&self, value: Value) -> Result<Self::Output, ExtractionError> {
        let plan: NutrientPlan = from_value(value)?;
        require_items("plan_details", &plan.plan_details)?;
        for (i, rec) in plan.plan_details.iter().enumerate() {
            check(
                "plan_details",
                i,
                validate_non_negative(rec.quantity_per_acre_kg),
            )?;
        }
        Ok(plan)
    }

    fn fallback(&self, reason: &FallbackReason) -> Self::Output {
        NutrientPlan {
            plan_details: vec![FertilizerRecommendation {
                fertilizer_type: "Error".to_string(),
                application_stage: "N/A".to_string(),
                quantity_per_acre_kg: 0.0,
                notes: reason.message(self.feature()),
            }],
        }
    }
}

// ============================================================================
// Irrigation Schedule
// ============================================================================

/// `{"schedule": [{"next_irrigation_date", "duration_minutes", "water_amount_mm", "reasoning"}, ...]}`
#[derive(Debug, Clone, Copy)]
pub struct IrrigationScheduleShape {
    /// Date placed on the fallback event
    pub today: NaiveDate,
}

impl ExpectedShape for IrrigationScheduleShape {
    type Output = IrrigationSchedule;

    fn feature(&self) -> Feature {
        Feature::IrrigationSchedule
    }

    fn parse(&self, value: Value) -> Result<Self::Output, ExtractionError> {
        let schedule: IrrigationSchedule = from_value(value)?;
        require_items("schedule", &schedule.schedule)?;
        for (i, event) in schedule.schedule.iter().enumerate() {
            check("schedule", i, validate_non_negative(event.duration_minutes))?;
            check("schedule", i, validate_non_negative(event.water_amount_mm))?;
        }
        Ok(schedule)
    }

    fn fallback(&self, reason: &FallbackReason) -> Self::Output {
        IrrigationSchedule {
            schedule: vec![IrrigationRecommendation {
                next_irrigation_date: self.today,
                duration_minutes: 0.0,
                water_amount_mm: 0.0,
                reasoning: reason.message(self.feature()),
            }],
        }
    }
}

// ============================================================================
// Nitrate Status
// ============================================================================

#[derive(Deserialize)]
struct NitrateReply {
    // Accepted for contract compatibility; the measured level always wins.
    #[serde(default)]
    #[allow(dead_code)]
    current_nitrate_level_ppm: Option<f64>,
    alert: AlertReply,
    notes: String,
}

#[derive(Deserialize)]
struct AlertReply {
    risk_level: String,
    message: String,
}

/// `{"current_nitrate_level_ppm": number, "alert": {"risk_level", "message"}, "notes"}`
#[derive(Debug, Clone, Copy)]
pub struct NitrateStatusShape {
    /// Level taken from the reading bundle
    pub measured_ppm: f64,
}

impl ExpectedShape for NitrateStatusShape {
    type Output = NitrateStatus;

    fn feature(&self) -> Feature {
        Feature::NitrateStatus
    }

    fn parse(&self, value: Value) -> Result<Self::Output, ExtractionError> {
        let reply: NitrateReply = from_value(value)?;
        let risk_level = RiskLevel::parse(&reply.alert.risk_level).ok_or_else(|| {
            ExtractionError::Schema(format!("unknown risk_level: {}", reply.alert.risk_level))
        })?;

        Ok(NitrateStatus {
            current_nitrate_level_ppm: self.measured_ppm,
            alert: NitrateAlert {
                risk_level,
                message: reply.alert.message,
            },
            notes: reply.notes,
        })
    }

    fn fallback(&self, reason: &FallbackReason) -> Self::Output {
        NitrateStatus {
            current_nitrate_level_ppm: self.measured_ppm,
            alert: NitrateAlert {
                risk_level: RiskLevel::Error,
                message: reason.message(self.feature()),
            },
            notes: format!(
                "Measured nitrate level is {} ppm. No risk assessment could be produced.",
                self.measured_ppm
            ),
        }
    }
}

// ============================================================================
// Soil Classification
// ============================================================================

#[derive(Deserialize)]
struct SoilReply {
    soil_type: String,
    confidence: f64,
}

/// `{"soil_type": str, "confidence": number 0-100}`
#[derive(Debug, Clone, Copy, Default)]
pub struct SoilClassificationShape;

impl ExpectedShape for SoilClassificationShape {
    type Output = SoilClassification;

    fn feature(&self) -> Feature {
        Feature::SoilClassification
    }

    fn parse(&self, value: Value) -> Result<Self::Output, ExtractionError> {
        let reply: SoilReply = from_value(value)?;
        validate_confidence_percent(reply.confidence)
            .map_err(|msg| ExtractionError::Schema(msg.to_string()))?;

        Ok(SoilClassification {
            soil_type: normalize_soil_type(&reply.soil_type).to_string(),
            confidence: reply.confidence / 100.0,
            message: String::new(),
        })
    }

    fn fallback(&self, reason: &FallbackReason) -> Self::Output {
        SoilClassification {
            soil_type: UNKNOWN_SOIL_TYPE.to_string(),
            confidence: 0.0,
            message: reason.message(self.feature()),
        }
    }
}
