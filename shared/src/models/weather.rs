//! Weather forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Precipitation probability (%) from which a day counts as rainy
pub const RAIN_PROBABILITY_THRESHOLD: f64 = 50.0;

/// Daily weather forecast for one location.
///
/// Provider values may be missing for far-out days, hence the options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub precipitation_sum_mm: Option<f64>,
    /// Maximum precipitation probability over the day (0-100)
    pub precipitation_probability: Option<f64>,
    pub wind_speed_max_kmh: Option<f64>,
    /// WMO weather interpretation code
    pub weather_code: Option<u16>,
}

/// Forecast wrapper embedded into irrigation prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub daily_forecast: Vec<DailyForecast>,
}

impl DailyForecast {
    /// Whether rain is expected: enough accumulated precipitation or a high probability
    pub fn is_rainy(&self, threshold_mm: f64) -> bool {
        self.precipitation_sum_mm
            .map(|mm| mm >= threshold_mm)
            .unwrap_or(false)
            || self
                .precipitation_probability
                .map(|p| p >= RAIN_PROBABILITY_THRESHOLD)
                .unwrap_or(false)
    }
}

impl WeatherForecast {
    /// Get days with rain in the forecast
    pub fn rainy_days(&self, threshold_mm: f64) -> Vec<&DailyForecast> {
        self.daily_forecast
            .iter()
            .filter(|day| day.is_rainy(threshold_mm))
            .collect()
    }

    /// First forecast date, if any
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.daily_forecast.first().map(|day| day.date)
    }
}
