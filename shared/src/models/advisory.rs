//! Advisory feature identity and result envelope

use serde::{Deserialize, Serialize};

use super::{
    CropRecommendationSet, IrrigationSchedule, NitrateStatus, NutrientPlan, SoilClassification,
};

/// The advisory features served by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    CropRecommendation,
    NutrientPlan,
    IrrigationSchedule,
    NitrateStatus,
    SoilClassification,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::CropRecommendation => "crop_recommendation",
            Feature::NutrientPlan => "nutrient_plan",
            Feature::IrrigationSchedule => "irrigation_schedule",
            Feature::NitrateStatus => "nitrate_status",
            Feature::SoilClassification => "soil_classification",
        }
    }

    /// Human wording used in fallback messages
    pub fn service_label(&self) -> &'static str {
        match self {
            Feature::CropRecommendation | Feature::NutrientPlan => "recommendation service",
            Feature::IrrigationSchedule => "scheduling service",
            Feature::NitrateStatus => "analysis service",
            Feature::SoilClassification => "classification service",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an advisory result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Parsed from the model reply
    Model,
    /// The model answered but the reply could not be parsed
    ExtractionFallback,
    /// The model or the weather provider could not be reached
    UpstreamFallback,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Model => "model",
            ResultSource::ExtractionFallback => "extraction_fallback",
            ResultSource::UpstreamFallback => "upstream_fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, ResultSource::Model)
    }

    /// Upstream failures never reached the model, so there is nothing to audit
    pub fn is_persistable(&self) -> bool {
        !matches!(self, ResultSource::UpstreamFallback)
    }
}

/// Why a fallback value was substituted for a model answer
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The reply contained no parseable object of the expected shape
    Unparseable,
    /// The model could not be reached; carries the failure detail
    ServiceError(String),
    /// The forecast needed for the prompt could not be fetched
    WeatherUnavailable,
}

impl FallbackReason {
    /// Placeholder text naming the failure, shown to the caller
    pub fn message(&self, feature: Feature) -> String {
        match self {
            FallbackReason::Unparseable => "Could not parse API response.".to_string(),
            FallbackReason::ServiceError(detail) => format!(
                "An issue occurred with the {}: {}",
                feature.service_label(),
                detail
            ),
            FallbackReason::WeatherUnavailable => {
                "Could not fetch weather data. Please try again later.".to_string()
            }
        }
    }

    pub fn source(&self) -> ResultSource {
        match self {
            FallbackReason::Unparseable => ResultSource::ExtractionFallback,
            FallbackReason::ServiceError(_) | FallbackReason::WeatherUnavailable => {
                ResultSource::UpstreamFallback
            }
        }
    }
}

/// Any advisory outcome, as handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "feature", rename_all = "snake_case")]
pub enum AdvisoryResult {
    CropRecommendation(CropRecommendationSet),
    NutrientPlan(NutrientPlan),
    IrrigationSchedule(IrrigationSchedule),
    NitrateStatus(NitrateStatus),
    SoilClassification(SoilClassification),
}

impl AdvisoryResult {
    pub fn feature(&self) -> Feature {
        match self {
            AdvisoryResult::CropRecommendation(_) => Feature::CropRecommendation,
            AdvisoryResult::NutrientPlan(_) => Feature::NutrientPlan,
            AdvisoryResult::IrrigationSchedule(_) => Feature::IrrigationSchedule,
            AdvisoryResult::NitrateStatus(_) => Feature::NitrateStatus,
            AdvisoryResult::SoilClassification(_) => Feature::SoilClassification,
        }
    }
}

impl From<CropRecommendationSet> for AdvisoryResult {
    fn from(value: CropRecommendationSet) -> Self {
        AdvisoryResult::CropRecommendation(value)
    }
}

impl From<NutrientPlan> for AdvisoryResult {
    fn from(value: NutrientPlan) -> Self {
        AdvisoryResult::NutrientPlan(value)
    }
}

impl From<IrrigationSchedule> for AdvisoryResult {
    fn from(value: IrrigationSchedule) -> Self {
        AdvisoryResult::IrrigationSchedule(value)
    }
}

impl From<NitrateStatus> for AdvisoryResult {
    fn from(value: NitrateStatus) -> Self {
        AdvisoryResult::NitrateStatus(value)
    }
}

impl From<SoilClassification> for AdvisoryResult {
    fn from(value: SoilClassification) -> Self {
        AdvisoryResult::SoilClassification(value)
    }
}
