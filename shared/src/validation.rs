//! Validation utilities for advisory requests and model output

// ============================================================================
// Request Validations
// ============================================================================

/// Validate latitude is a finite value in [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() {
        return Err("Latitude must be a finite number");
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90 degrees");
    }
    Ok(())
}

/// Validate longitude is a finite value in [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), &'static str> {
    if !longitude.is_finite() {
        return Err("Longitude must be a finite number");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180 degrees");
    }
    Ok(())
}

/// Validate a coordinate pair, reporting the offending field name
pub fn validate_coordinates(
    latitude: f64,
    longitude: f64,
) -> Result<(), (&'static str, &'static str)> {
    validate_latitude(latitude).map_err(|msg| ("latitude", msg))?;
    validate_longitude(longitude).map_err(|msg| ("longitude", msg))?;
    Ok(())
}

// ============================================================================
// Model Output Validations
// ============================================================================

/// Validate suitability score is in [0, 1]
pub fn validate_suitability_score(score: f64) -> Result<(), &'static str> {
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err("suitability_score must be between 0 and 1");
    }
    Ok(())
}

/// Validate a quantity, duration or depth is finite and not negative
pub fn validate_non_negative(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || value < 0.0 {
        return Err("value must be a non-negative number");
    }
    Ok(())
}

/// Validate a classifier confidence on the 0-100 scale
pub fn validate_confidence_percent(confidence: f64) -> Result<(), &'static str> {
    if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
        return Err("confidence must be between 0 and 100");
    }
    Ok(())
}
