//! HTTP handlers for soil image analysis

use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::coordinates;
use crate::error::{AppError, AppResult};
use crate::external::ImageInput;
use crate::middleware::CurrentUser;
use crate::services::RequestContext;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SoilAnalysisResponse {
    pub image_filename: String,
    pub predicted_soil_type: String,
    pub confidence: f64,
    /// Why the classification fell back; absent for model answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub fallback: bool,
    pub analysis_timestamp: DateTime<Utc>,
}

/// Parsed multipart form
#[derive(Default)]
struct SoilUpload {
    image: Option<(String, ImageInput)>,
    farm_id: Option<Uuid>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::validation("file", format!("Invalid multipart body: {}", e))
}

async fn field_text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map(|text| text.trim().to_string())
        .map_err(multipart_error)
}

async fn field_number(field: Field<'_>, name: &str) -> AppResult<f64> {
    field_text(field)
        .await?
        .parse::<f64>()
        .map_err(|_| AppError::validation(name, format!("{} must be a number", name)))
}

async fn read_upload(mut multipart: Multipart) -> AppResult<SoilUpload> {
    let mut upload = SoilUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                if !mime_type.starts_with("image/") {
                    return Err(AppError::validation("file", "File provided is not an image."));
                }
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.is_empty() {
                    return Err(AppError::validation("file", "Uploaded image is empty"));
                }
                upload.image = Some((
                    filename,
                    ImageInput {
                        mime_type,
                        bytes: bytes.to_vec(),
                    },
                ));
            }
            "farm_id" => {
                let text = field_text(field).await?;
                let farm_id = Uuid::parse_str(&text)
                    .map_err(|_| AppError::validation("farm_id", "farm_id must be a UUID"))?;
                upload.farm_id = Some(farm_id);
            }
            "latitude" => upload.latitude = Some(field_number(field, "latitude").await?),
            "longitude" => upload.longitude = Some(field_number(field, "longitude").await?),
            _ => {}
        }
    }

    Ok(upload)
}

/// Classify the soil in an uploaded photo
pub async fn analyze_soil_image(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Json<SoilAnalysisResponse>> {
    let upload = read_upload(multipart).await?;

    let (image_filename, image) = upload
        .image
        .ok_or_else(|| AppError::validation("file", "An image file is required"))?;

    let location = match (upload.latitude, upload.longitude) {
        (Some(lat), Some(lon)) => Some(coordinates(lat, lon)?),
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "latitude",
                "latitude and longitude must be given together",
            ))
        }
    };

    let ctx = RequestContext {
        user_id: current_user.0.user_id,
        farm_id: upload.farm_id,
        location,
    };
    let run = state
        .services
        .classify_soil(&ctx, image_filename.clone(), &image)
        .await?;

    let fallback = run.is_fallback();
    let soil = run.result;

    Ok(Json(SoilAnalysisResponse {
        image_filename,
        predicted_soil_type: soil.soil_type,
        confidence: soil.confidence,
        message: (!soil.message.is_empty()).then_some(soil.message),
        fallback,
        analysis_timestamp: run.generated_at,
    }))
}
