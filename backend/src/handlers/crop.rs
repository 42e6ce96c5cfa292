//! HTTP handlers for crop recommendations

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{CropParams, CropRecommendation};
use uuid::Uuid;
use validator::Validate;

use super::{coordinates, require_text, ApiJson};
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::RequestContext;
use crate::AppState;

/// Request body for crop recommendations
#[derive(Debug, Deserialize, Validate)]
pub struct CropRecommendationRequest {
    pub farm_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "soil_type must be 1-100 characters"))]
    pub soil_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct CropRecommendationResponse {
    pub recommendations: Vec<CropRecommendation>,
    pub fallback: bool,
    pub timestamp: DateTime<Utc>,
}

/// Recommend crops for a farm
pub async fn recommend_crops(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<CropRecommendationRequest>,
) -> AppResult<Json<CropRecommendationResponse>> {
    let location = coordinates(input.latitude, input.longitude)?;
    input.validate()?;
    let soil_type = require_text("soil_type", &input.soil_type)?;

    let ctx = RequestContext {
        user_id: current_user.0.user_id,
        farm_id: Some(input.farm_id),
        location: Some(location),
    };
    let run = state
        .services
        .recommend_crops(&ctx, CropParams { soil_type })
        .await?;

    Ok(Json(CropRecommendationResponse {
        fallback: run.is_fallback(),
        timestamp: run.generated_at,
        recommendations: run.result.recommendations,
    }))
}
