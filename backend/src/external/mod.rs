//! External API integrations
//!
//! Each upstream sits behind a trait so the advisory services can be driven
//! by stubs in tests. Implementations are built once at startup and shared
//! as `Arc<dyn ...>`.

use async_trait::async_trait;
use shared::{GpsCoordinates, PromptText, WeatherForecast};

use crate::error::AppResult;

pub mod gemini;
pub mod open_meteo;

pub use gemini::GeminiClient;
pub use open_meteo::OpenMeteoClient;

/// Image attached to a model request
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// MIME type as uploaded, e.g. `image/jpeg`
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Sends one prompt to the generative model and returns its raw text reply.
///
/// Exactly one outbound request per call. Any transport failure, timeout,
/// non-success status or empty reply is `AppError::UpstreamUnavailable`.
#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn complete(&self, prompt: &PromptText, image: Option<&ImageInput>)
        -> AppResult<String>;
}

/// Daily forecast source for irrigation planning
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn daily_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast>;
}
