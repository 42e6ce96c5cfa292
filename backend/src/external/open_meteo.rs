//! Open-Meteo forecast client
//!
//! Fetches the daily forecast used by irrigation planning. No API key is
//! required; values Open-Meteo cannot provide come back as `null`.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use shared::{DailyForecast, GpsCoordinates, WeatherForecast};
use std::time::Duration;

use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code,precipitation_sum,precipitation_probability_max,wind_speed_10m_max";

/// Open-Meteo API client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    forecast_days: u8,
}

/// Open-Meteo API response for the daily forecast
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: OpenMeteoDaily,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<u16>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
}

fn at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

impl From<OpenMeteoDaily> for WeatherForecast {
    fn from(daily: OpenMeteoDaily) -> Self {
        let daily_forecast = daily
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| DailyForecast {
                date: *date,
                temp_min: at(&daily.temperature_2m_min, i),
                temp_max: at(&daily.temperature_2m_max, i),
                precipitation_sum_mm: at(&daily.precipitation_sum, i),
                precipitation_probability: at(&daily.precipitation_probability_max, i),
                wind_speed_max_kmh: at(&daily.wind_speed_10m_max, i),
                weather_code: at(&daily.weather_code, i),
            })
            .collect();

        WeatherForecast { daily_forecast }
    }
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn daily_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast> {
        let url = format!("{}/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", self.forecast_days.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("Weather API request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OpenMeteoResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Failed to parse forecast response: {}", e))
        })?;

        Ok(data.daily.into())
    }
}
