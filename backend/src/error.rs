//! Error handling for the agricultural advisory backend
//!
//! Every error renders as `{"error": {"code", "message", "field"?}}`.
//! Upstream and extraction failures normally never reach this layer: the
//! advisory pipeline turns them into fallback results with a 200 status.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Upstream errors
    #[error("Upstream configuration error: {0}")]
    UpstreamConfig(String),

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    // Persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", msg.clone()),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_TOKEN", "Invalid token"),
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new("FORBIDDEN", msg.clone()),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::UpstreamConfig(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "UPSTREAM_CONFIG_ERROR",
                    "The advisory model is not configured",
                ),
            ),
            AppError::UpstreamUnavailable(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "UPSTREAM_UNAVAILABLE",
                    format!("Upstream service unavailable: {}", msg),
                ),
            ),
            AppError::Persistence(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("PERSISTENCE_ERROR", "Failed to store the advisory result"),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DATABASE_ERROR", "A database error occurred"),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone()),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred"),
            ),
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                AppError::validation(*field, message)
            }
            None => AppError::validation("request", "Request validation failed"),
        }
    }
}

/// Field named in a serde deserialization message, if any.
///
/// Recognizes `missing field `name`` and the `name: ...` path prefix that
/// axum adds to JSON data errors.
fn rejected_field(text: &str) -> Option<String> {
    if let Some(rest) = text.split("missing field `").nth(1) {
        return rest.split('`').next().map(str::to_string);
    }

    let detail = text.split("target type: ").nth(1)?;
    let (path, _) = detail.split_once(": ")?;
    let is_field = !path.is_empty()
        && path.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_field.then(|| path.to_string())
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let field = rejected_field(&message).unwrap_or_else(|| "request".to_string());
        AppError::validation(field, message)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let message = rejection.body_text();
        let field = rejected_field(&message).unwrap_or_else(|| "query".to_string());
        AppError::validation(field, message)
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Unauthorized("missing".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("farm".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::validation("latitude", "out of range")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UpstreamConfig("no key".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejected_field() {
        assert_eq!(
            rejected_field("Failed to deserialize the JSON body into the target type: missing field `latitude` at line 1 column 60"),
            Some("latitude".to_string())
        );
        assert_eq!(
            rejected_field("Failed to deserialize the JSON body into the target type: latitude: invalid type: string \"north\", expected f64 at line 1 column 52"),
            Some("latitude".to_string())
        );
        assert_eq!(
            rejected_field("Failed to parse the request body as JSON: expected value at line 1 column 1"),
            None
        );
    }
}
