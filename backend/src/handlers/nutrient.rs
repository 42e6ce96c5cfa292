//! HTTP handlers for nutrient plans

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{FertilizerRecommendation, NutrientParams};
use uuid::Uuid;
use validator::Validate;

use super::{coordinates, require_text, ApiJson};
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::RequestContext;
use crate::AppState;

/// Request body for a nutrient plan
#[derive(Debug, Deserialize, Validate)]
pub struct NutrientPlanRequest {
    pub farm_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "crop_name must be 1-100 characters"))]
    pub crop_name: String,
    #[validate(length(min = 1, max = 100, message = "soil_type must be 1-100 characters"))]
    pub soil_type: String,
    #[validate(length(min = 1, max = 50, message = "season must be 1-50 characters"))]
    pub season: String,
    #[validate(length(min = 1, max = 50, message = "zone must be 1-50 characters"))]
    pub zone: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct NutrientPlanResponse {
    pub crop_name: String,
    pub plan_details: Vec<FertilizerRecommendation>,
    pub fallback: bool,
    pub timestamp: DateTime<Utc>,
}

/// Create a nutrient plan for a crop on a farm
pub async fn create_nutrient_plan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<NutrientPlanRequest>,
) -> AppResult<Json<NutrientPlanResponse>> {
    let location = coordinates(input.latitude, input.longitude)?;
    input.validate()?;

    let params = NutrientParams {
        crop_name: require_text("crop_name", &input.crop_name)?,
        soil_type: require_text("soil_type", &input.soil_type)?,
        season: require_text("season", &input.season)?,
        zone: require_text("zone", &input.zone)?,
    };
    let crop_name = params.crop_name.clone();

    let ctx = RequestContext {
        user_id: current_user.0.user_id,
        farm_id: Some(input.farm_id),
        location: Some(location),
    };
    let run = state.services.nutrient_plan(&ctx, params).await?;

    Ok(Json(NutrientPlanResponse {
        crop_name,
        fallback: run.is_fallback(),
        timestamp: run.generated_at,
        plan_details: run.result.plan_details,
    }))
}
