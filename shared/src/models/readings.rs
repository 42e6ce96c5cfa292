//! Environmental reading models

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// A bundle of environmental measurements for one location at one point in time.
///
/// Produced fresh for every advisory request and embedded into the prompt and
/// the persisted record. Missing sensor values are represented as `0.0`, never
/// as an absent field, so a prompt can always be rendered from a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingBundle {
    pub latitude: f64,
    pub longitude: f64,
    /// Volumetric soil moisture (%)
    pub soil_moisture: f64,
    /// Soil temperature (°C)
    pub soil_temperature: f64,
    /// Electrical conductivity / salinity (dS/m)
    pub electrical_conductivity: f64,
    pub soil_ph: f64,
    /// Relative air humidity (%)
    pub relative_humidity: f64,
    /// Solar radiation (W/m²)
    pub solar_radiation: f64,
    /// Soil nitrate concentration (ppm)
    pub nitrate_ppm: f64,
}

impl ReadingBundle {
    /// A bundle with every measurement at zero, used when no data source answers.
    pub fn empty(location: GpsCoordinates) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            soil_moisture: 0.0,
            soil_temperature: 0.0,
            electrical_conductivity: 0.0,
            soil_ph: 0.0,
            relative_humidity: 0.0,
            solar_radiation: 0.0,
            nitrate_ppm: 0.0,
        }
    }

    pub fn location(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }
}
