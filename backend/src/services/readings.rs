//! Environmental reading providers
//!
//! Real soil probes are not wired in yet; the simulated provider stands in
//! with plausible values that stay stable for a location over a UTC day.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sha2::{Digest, Sha256};
use shared::{GpsCoordinates, ReadingBundle};

/// Supplies the reading bundle for a location. Never fails: a source that
/// cannot answer returns zeros for the missing values.
#[async_trait]
pub trait ReadingProvider: Send + Sync {
    async fn readings(&self, location: GpsCoordinates) -> ReadingBundle;
}

// Plausible agronomic ranges (min, max)
const SOIL_MOISTURE: (f64, f64) = (20.0, 60.0);
const SOIL_TEMPERATURE: (f64, f64) = (15.0, 35.0);
const ELECTRICAL_CONDUCTIVITY: (f64, f64) = (0.5, 3.0);
const SOIL_PH: (f64, f64) = (5.5, 7.5);
const RELATIVE_HUMIDITY: (f64, f64) = (40.0, 95.0);
const SOLAR_RADIATION: (f64, f64) = (100.0, 1000.0);
const NITRATE_PPM: (f64, f64) = (5.0, 40.0);

/// Deterministic sensor simulator keyed on (rounded location, UTC day)
#[derive(Debug, Clone, Default)]
pub struct SimulatedReadingProvider {
    fixed_day: Option<NaiveDate>,
}

impl SimulatedReadingProvider {
    pub fn new() -> Self {
        Self { fixed_day: None }
    }

    /// Pin the simulated day instead of following the clock
    pub fn with_day(day: NaiveDate) -> Self {
        Self {
            fixed_day: Some(day),
        }
    }

    /// Simulated bundle for a location on a given day
    pub fn simulate(location: GpsCoordinates, day: NaiveDate) -> ReadingBundle {
        let key = format!(
            "{:.4},{:.4},{}",
            location.latitude, location.longitude, day
        );
        let digest = Sha256::digest(key.as_bytes());

        // Two digest bytes per reading
        let sample = |slot: usize, (min, max): (f64, f64)| -> f64 {
            let raw = u16::from_be_bytes([digest[slot * 2], digest[slot * 2 + 1]]);
            let value = min + (raw as f64 / u16::MAX as f64) * (max - min);
            (value * 100.0).round() / 100.0
        };

        ReadingBundle {
            latitude: location.latitude,
            longitude: location.longitude,
            soil_moisture: sample(0, SOIL_MOISTURE),
            soil_temperature: sample(1, SOIL_TEMPERATURE),
            electrical_conductivity: sample(2, ELECTRICAL_CONDUCTIVITY),
            soil_ph: sample(3, SOIL_PH),
            relative_humidity: sample(4, RELATIVE_HUMIDITY),
            solar_radiation: sample(5, SOLAR_RADIATION),
            nitrate_ppm: sample(6, NITRATE_PPM),
        }
    }
}

#[async_trait]
impl ReadingProvider for SimulatedReadingProvider {
    async fn readings(&self, location: GpsCoordinates) -> ReadingBundle {
        let day = self.fixed_day.unwrap_or_else(|| Utc::now().date_naive());
        let bundle = Self::simulate(location, day);
        tracing::debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            %day,
            "Simulated sensor readings"
        );
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn within(value: f64, (min, max): (f64, f64)) -> bool {
        value >= min && value <= max
    }

    #[test]
    fn test_values_within_ranges() {
        for (lat, lon) in [(-15.4, 28.3), (-12.8, 28.2), (0.0, 0.0), (89.9, -179.9)] {
            let r = SimulatedReadingProvider::simulate(GpsCoordinates::new(lat, lon), day(1));
            assert!(within(r.soil_moisture, SOIL_MOISTURE));
            assert!(within(r.soil_temperature, SOIL_TEMPERATURE));
            assert!(within(r.electrical_conductivity, ELECTRICAL_CONDUCTIVITY));
            assert!(within(r.soil_ph, SOIL_PH));
            assert!(within(r.relative_humidity, RELATIVE_HUMIDITY));
            assert!(within(r.solar_radiation, SOLAR_RADIATION));
            assert!(within(r.nitrate_ppm, NITRATE_PPM));
            assert_eq!(r.latitude, lat);
            assert_eq!(r.longitude, lon);
        }
    }

    #[test]
    fn test_stable_within_a_day() {
        let lusaka = GpsCoordinates::new(-15.4, 28.3);
        assert_eq!(
            SimulatedReadingProvider::simulate(lusaka, day(2)),
            SimulatedReadingProvider::simulate(lusaka, day(2))
        );
        assert_ne!(
            SimulatedReadingProvider::simulate(lusaka, day(2)),
            SimulatedReadingProvider::simulate(lusaka, day(3))
        );
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let r = SimulatedReadingProvider::simulate(GpsCoordinates::new(-15.4, 28.3), day(4));
        for value in [r.soil_moisture, r.soil_ph, r.nitrate_ppm] {
            assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_fixed_day_provider() {
        let provider = SimulatedReadingProvider::with_day(day(5));
        let location = GpsCoordinates::new(-15.4, 28.3);
        assert_eq!(
            provider.readings(location).await,
            SimulatedReadingProvider::simulate(location, day(5))
        );
    }
}
