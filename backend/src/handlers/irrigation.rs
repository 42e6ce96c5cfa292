//! HTTP handlers for irrigation schedules

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::IrrigationRecommendation;
use uuid::Uuid;
use validator::Validate;

use super::{coordinates, require_text, ApiJson};
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::RequestContext;
use crate::AppState;

/// Request body for an irrigation schedule
#[derive(Debug, Deserialize, Validate)]
pub struct IrrigationScheduleRequest {
    pub farm_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "crop_name must be 1-100 characters"))]
    pub crop_name: String,
    #[validate(length(min = 1, max = 100, message = "soil_type must be 1-100 characters"))]
    pub soil_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct IrrigationScheduleResponse {
    pub crop_name: String,
    pub schedule: Vec<IrrigationRecommendation>,
    pub fallback: bool,
    pub timestamp: DateTime<Utc>,
}

/// Create an irrigation schedule from readings and the weather forecast
pub async fn create_irrigation_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<IrrigationScheduleRequest>,
) -> AppResult<Json<IrrigationScheduleResponse>> {
    let location = coordinates(input.latitude, input.longitude)?;
    input.validate()?;
    let crop_name = require_text("crop_name", &input.crop_name)?;
    let soil_type = require_text("soil_type", &input.soil_type)?;

    let ctx = RequestContext {
        user_id: current_user.0.user_id,
        farm_id: input.farm_id,
        location: Some(location),
    };
    let run = state
        .services
        .irrigation_schedule(&ctx, crop_name.clone(), soil_type)
        .await?;

    Ok(Json(IrrigationScheduleResponse {
        crop_name,
        fallback: run.is_fallback(),
        timestamp: run.generated_at,
        schedule: run.result.schedule,
    }))
}
