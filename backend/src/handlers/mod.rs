//! HTTP handlers for the advisory API

pub mod crop;
pub mod health;
pub mod irrigation;
pub mod nitrate;
pub mod nutrient;
pub mod soil;

pub use crop::recommend_crops;
pub use health::health_check;
pub use irrigation::create_irrigation_schedule;
pub use nitrate::get_nitrate_status;
pub use nutrient::create_nutrient_plan;
pub use soil::analyze_soil_image;

use axum::extract::{FromRequest, FromRequestParts};
use shared::{validate_coordinates, GpsCoordinates};

use crate::error::{AppError, AppResult};

/// JSON body extractor that rejects malformed input as a validation error
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that rejects malformed input as a validation error
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Check a coordinate pair and turn it into [`GpsCoordinates`]
pub(crate) fn coordinates(latitude: f64, longitude: f64) -> AppResult<GpsCoordinates> {
    validate_coordinates(latitude, longitude)
        .map_err(|(field, message)| AppError::validation(field, message))?;
    Ok(GpsCoordinates::new(latitude, longitude))
}

/// Reject text parameters that are blank after trimming
pub(crate) fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(field, format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
