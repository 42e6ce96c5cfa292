//! Irrigation schedule models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single recommended irrigation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationRecommendation {
    pub next_irrigation_date: NaiveDate,
    pub duration_minutes: f64,
    /// Equivalent water depth delivered (mm)
    pub water_amount_mm: f64,
    pub reasoning: String,
}

/// Ordered irrigation events for the coming week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationSchedule {
    pub schedule: Vec<IrrigationRecommendation>,
}
