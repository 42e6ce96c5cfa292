//! Test doubles for the advisory services
//!
//! Each stub records what it was asked so tests can assert on the calls.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use agri_advisor_backend::error::{AppError, AppResult};
use agri_advisor_backend::external::{AiGateway, ImageInput, WeatherProvider};
use agri_advisor_backend::services::{
    AdvisoryPipeline, AdvisoryRecord, AdvisoryServices, AdvisoryStore, FarmDirectory,
    IrrigationController, SimulatedReadingProvider,
};
use shared::{DailyForecast, GpsCoordinates, IrrigationRecommendation, PromptText, WeatherForecast};

pub const NUTRIENT_EXAMPLE_REPLY: &str = r#"{
  "plan_details": [
    {
      "fertilizer_type": "D-Compound (Synthetic)",
      "application_stage": "Planting",
      "quantity_per_acre_kg": 50.0,
      "notes": "Apply at the time of planting to provide a strong foundation, as the current soil pH is ideal for initial nutrient uptake."
    },
    {
      "fertilizer_type": "Compost (Organic)",
      "application_stage": "Vegetative Stage",
      "quantity_per_acre_kg": 200.0,
      "notes": "Top-dress the soil to improve organic matter and water retention, especially given the low soil moisture reading."
    }
  ]
}"#;

pub const CROP_REPLY: &str = r#"```json
{
  "recommendations": [
    {"crop_name": "Maize", "reasoning": "Staple crop suited to loamy soil.", "suitability_score": 0.95},
    {"crop_name": "Sorghum", "reasoning": "Drought tolerant.", "suitability_score": 0.88},
    {"crop_name": "Groundnuts", "reasoning": "Fixes nitrogen.", "suitability_score": 0.8}
  ]
}
```"#;

pub const IRRIGATION_REPLY: &str = r#"{
  "schedule": [
    {"next_irrigation_date": "2025-03-10", "duration_minutes": 30.0, "water_amount_mm": 15.0, "reasoning": "Low moisture and no rain expected."},
    {"next_irrigation_date": "2025-03-13", "duration_minutes": 20.0, "water_amount_mm": 10.0, "reasoning": "Follow-up irrigation."}
  ]
}"#;

pub fn reading_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

pub fn lusaka() -> GpsCoordinates {
    GpsCoordinates::new(-15.4, 28.3)
}

// ============================================================================
// Gateway
// ============================================================================

/// Recorded gateway call: prompt text and attached image MIME type
#[derive(Debug, Clone)]
pub struct GatewayCall {
    pub prompt: String,
    pub image_mime_type: Option<String>,
}

pub struct StubGateway {
    reply: Result<String, String>,
    pub calls: Mutex<Vec<GatewayCall>>,
}

impl StubGateway {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(detail.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiGateway for StubGateway {
    async fn complete(&self, prompt: &PromptText, image: Option<&ImageInput>) -> AppResult<String> {
        self.calls.lock().unwrap().push(GatewayCall {
            prompt: prompt.as_str().to_string(),
            image_mime_type: image.map(|i| i.mime_type.clone()),
        });
        self.reply
            .clone()
            .map_err(AppError::UpstreamUnavailable)
    }
}

// ============================================================================
// Farms, store, weather, controller
// ============================================================================

pub struct StubFarms {
    owned: Vec<(Uuid, Uuid)>,
}

impl StubFarms {
    /// Directory where `user_id` owns exactly `farm_id`
    pub fn owning(farm_id: Uuid, user_id: Uuid) -> Arc<Self> {
        Arc::new(Self {
            owned: vec![(farm_id, user_id)],
        })
    }
}

#[async_trait]
impl FarmDirectory for StubFarms {
    async fn is_owned_by(&self, farm_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        Ok(self.owned.contains(&(farm_id, user_id)))
    }
}

pub struct RecordingStore {
    fail: bool,
    pub records: Mutex<Vec<AdvisoryRecord>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            records: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            records: Mutex::new(Vec::new()),
        })
    }

    pub fn records(&self) -> Vec<AdvisoryRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdvisoryStore for RecordingStore {
    async fn save(&self, record: &AdvisoryRecord) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Persistence("connection reset".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct StubWeather {
    forecast: Option<WeatherForecast>,
}

impl StubWeather {
    pub fn available() -> Arc<Self> {
        let day = |d: u32, mm: f64, prob: f64| DailyForecast {
            date: NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            temp_min: Some(16.0),
            temp_max: Some(29.0),
            precipitation_sum_mm: Some(mm),
            precipitation_probability: Some(prob),
            wind_speed_max_kmh: Some(10.0),
            weather_code: Some(3),
        };
        Arc::new(Self {
            forecast: Some(WeatherForecast {
                daily_forecast: vec![day(10, 0.0, 5.0), day(11, 7.5, 80.0), day(12, 0.0, 10.0)],
            }),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self { forecast: None })
    }
}

#[async_trait]
impl WeatherProvider for StubWeather {
    async fn daily_forecast(&self, _location: GpsCoordinates) -> AppResult<WeatherForecast> {
        self.forecast
            .clone()
            .ok_or_else(|| AppError::UpstreamUnavailable("Weather API error: 503".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingController {
    pub dispatched: Mutex<Vec<IrrigationRecommendation>>,
}

#[async_trait]
impl IrrigationController for RecordingController {
    async fn dispatch(
        &self,
        _farm_id: Option<Uuid>,
        event: &IrrigationRecommendation,
    ) -> AppResult<()> {
        self.dispatched.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ============================================================================
// Assembly
// ============================================================================

pub struct Harness {
    pub gateway: Arc<StubGateway>,
    pub store: Arc<RecordingStore>,
    pub controller: Arc<RecordingController>,
    pub services: AdvisoryServices,
}

pub fn harness(
    gateway: Arc<StubGateway>,
    farms: Arc<StubFarms>,
    store: Arc<RecordingStore>,
    weather: Arc<StubWeather>,
) -> Harness {
    let controller = Arc::new(RecordingController::default());
    let pipeline = AdvisoryPipeline::new(
        gateway.clone(),
        Arc::new(SimulatedReadingProvider::with_day(reading_day())),
        farms,
        store.clone(),
    );
    let services = AdvisoryServices::new(pipeline, weather, controller.clone());

    Harness {
        gateway,
        store,
        controller,
        services,
    }
}
