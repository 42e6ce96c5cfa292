//! HTTP handlers for nitrate status

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::NitrateStatus;
use uuid::Uuid;

use super::{coordinates, ApiQuery};
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::RequestContext;
use crate::AppState;

/// Query parameters for nitrate status
#[derive(Debug, Deserialize)]
pub struct NitrateStatusQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub farm_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct NitrateStatusResponse {
    #[serde(flatten)]
    pub status: NitrateStatus,
    pub fallback: bool,
    pub timestamp: DateTime<Utc>,
}

/// Assess the current nitrate level at a location
pub async fn get_nitrate_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<NitrateStatusQuery>,
) -> AppResult<Json<NitrateStatusResponse>> {
    let location = coordinates(query.latitude, query.longitude)?;

    let ctx = RequestContext {
        user_id: current_user.0.user_id,
        farm_id: query.farm_id,
        location: Some(location),
    };
    let run = state.services.nitrate_status(&ctx).await?;

    Ok(Json(NitrateStatusResponse {
        fallback: run.is_fallback(),
        timestamp: run.generated_at,
        status: run.result,
    }))
}
