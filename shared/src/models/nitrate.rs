//! Nitrate monitoring models

use serde::{Deserialize, Serialize};

/// Lower bound of the optimal nitrate band (ppm)
pub const NITRATE_OPTIMAL_MIN_PPM: f64 = 15.0;

/// Upper bound of the optimal nitrate band (ppm)
pub const NITRATE_OPTIMAL_MAX_PPM: f64 = 25.0;

/// Nitrate risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Optimal,
    /// Sentinel used when no assessment could be produced
    Error,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Optimal => "Optimal",
            RiskLevel::Error => "Error",
        }
    }

    /// Parse a risk level as written by the model (case-insensitive).
    ///
    /// `Error` is reserved for fallbacks and is never accepted from a reply.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" | "moderate" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "optimal" => Some(RiskLevel::Optimal),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk alert attached to a nitrate status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NitrateAlert {
    pub risk_level: RiskLevel,
    pub message: String,
}

/// Nitrate assessment for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NitrateStatus {
    /// Measured level from the reading bundle, never the model's echo
    pub current_nitrate_level_ppm: f64,
    pub alert: NitrateAlert,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_parsing() {
        assert_eq!(RiskLevel::parse("Optimal"), Some(RiskLevel::Optimal));
        assert_eq!(RiskLevel::parse(" high "), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("LOW"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::parse("Moderate"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::parse("Critical"), None);
    }

    #[test]
    fn test_error_level_is_not_parsed() {
        assert_eq!(RiskLevel::parse("Error"), None);
        assert_eq!(RiskLevel::parse(" error "), None);
    }

    #[test]
    fn test_risk_level_serializes_as_name() {
        let json = serde_json::to_string(&RiskLevel::Optimal).unwrap();
        assert_eq!(json, "\"Optimal\"");
    }
}
