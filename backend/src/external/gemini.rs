//! Gemini client
//!
//! Calls the `generateContent` REST endpoint with a single user turn made of
//! the prompt text and, for soil analysis, the uploaded image as inline data.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::PromptText;
use std::time::Duration;

use super::{AiGateway, ImageInput};
use crate::config::GeminiConfig;
use crate::error::{AppError, AppResult};

/// Client for the Gemini generative language API
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

/// Response from generateContent
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: &GeminiConfig) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::UpstreamConfig(
                "Gemini API key is not configured".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body<'a>(
        prompt: &'a PromptText,
        image: Option<&ImageInput>,
    ) -> GenerateContentRequest<'a> {
        let mut parts = vec![Part {
            text: Some(prompt.as_str()),
            inline_data: None,
        }];
        if let Some(image) = image {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: image.mime_type.clone(),
                    data: STANDARD.encode(&image.bytes),
                }),
            });
        }

        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

#[async_trait]
impl AiGateway for GeminiClient {
    async fn complete(
        &self,
        prompt: &PromptText,
        image: Option<&ImageInput>,
    ) -> AppResult<String> {
        let body = Self::request_body(prompt, image);

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamUnavailable(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Failed to parse response: {}", e))
        })?;

        result
            .text()
            .ok_or_else(|| AppError::UpstreamUnavailable("Model returned no text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(api_key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_missing_key_is_config_error() {
        assert!(matches!(
            GeminiClient::new(&config("")),
            Err(AppError::UpstreamConfig(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(&config("key")).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_request_body_with_image() {
        let prompt = shared::build_prompt(
            &shared::AdvisoryParams::NitrateStatus,
            &shared::ReadingBundle::empty(shared::GpsCoordinates::new(-15.4, 28.3)),
        );
        let image = ImageInput {
            mime_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let body = serde_json::to_value(GeminiClient::request_body(&prompt, Some(&image))).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], prompt.as_str());
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"],
            json!({"mimeType": "image/png", "data": "AQID"})
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_response_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\": "}, {"text": "1}"}], "role": "model"},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\": 1}"));

        let empty: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert_eq!(empty.text(), None);
    }
}
