//! Extraction and prompt property tests
//!
//! Tests for the model-reply boundary including:
//! - Embedded objects survive arbitrary brace-free prose around them
//! - Replies without a brace pair never panic and report NoJsonObject
//! - Prompts are byte-identical for equal inputs

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use shared::extract::{CropRecommendationShape, NitrateStatusShape, SoilClassificationShape};
use shared::{
    build_prompt, extract, extract_json, AdvisoryParams, CropParams, ExtractionError,
    GpsCoordinates, NutrientParams, ReadingBundle,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Three recommendations keep their fields and order
    #[test]
    fn test_crop_reply_with_three_items() {
        let reply = json!({
            "recommendations": [
                {"crop_name": "Maize", "reasoning": "Staple.", "suitability_score": 0.95},
                {"crop_name": "Sorghum", "reasoning": "Drought tolerant.", "suitability_score": 0.88},
                {"crop_name": "Cassava", "reasoning": "Hardy.", "suitability_score": 0.7}
            ]
        });
        let raw = format!("Here are my recommendations:\n{}\nGood luck!", reply);

        let set = extract(&raw, &CropRecommendationShape).unwrap();
        assert_eq!(set.recommendations.len(), 3);
        for (parsed, expected) in set.recommendations.iter().zip(reply["recommendations"].as_array().unwrap()) {
            assert_eq!(parsed.crop_name, expected["crop_name"]);
            assert_eq!(parsed.reasoning, expected["reasoning"]);
            assert_eq!(Value::from(parsed.suitability_score), expected["suitability_score"]);
        }
    }

    /// Flat nitrate replies are not the canonical contract
    #[test]
    fn test_flat_nitrate_reply_rejected() {
        let raw = r#"{"current_nitrate_level_ppm": 12, "risk_level": "Low", "message": "Apply nitrogen."}"#;
        let err = extract(raw, &NitrateStatusShape { measured_ppm: 12.0 }).unwrap_err();
        assert!(matches!(err, ExtractionError::Schema(_)));
    }

    /// Stray brace after the object breaks the slice
    #[test]
    fn test_trailing_brace_is_a_known_limitation() {
        let raw = r#"{"soil_type": "Red Soil", "confidence": 70} (confidence is approximate})"#;
        assert!(matches!(
            extract(raw, &SoilClassificationShape),
            Err(ExtractionError::InvalidJson(_))
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Prose around the object: anything but braces
    fn prose_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,:;!?\n`'\"-]{0,60}"
    }

    /// Flat JSON object with string and integer values
    fn object_strategy() -> impl Strategy<Value = Value> {
        prop::collection::btree_map(
            "[a-z_]{1,12}",
            prop_oneof![
                any::<i64>().prop_map(Value::from),
                "[a-zA-Z0-9 ]{0,20}".prop_map(Value::from),
                any::<bool>().prop_map(Value::from),
            ],
            0..6,
        )
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>()))
    }

    fn reading_strategy() -> impl Strategy<Value = ReadingBundle> {
        (
            -90.0f64..=90.0,
            -180.0f64..=180.0,
            20.0f64..=60.0,
            15.0f64..=35.0,
            5.5f64..=7.5,
            5.0f64..=40.0,
        )
            .prop_map(|(lat, lon, moisture, temperature, ph, nitrate)| ReadingBundle {
                soil_moisture: moisture,
                soil_temperature: temperature,
                soil_ph: ph,
                nitrate_ppm: nitrate,
                ..ReadingBundle::empty(GpsCoordinates::new(lat, lon))
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// An object embedded in brace-free prose comes back unchanged
        #[test]
        fn prop_embedded_object_extracted(
            prefix in prose_strategy(),
            object in object_strategy(),
            suffix in prose_strategy()
        ) {
            let raw = format!("{}{}{}", prefix, object, suffix);
            prop_assert_eq!(extract_json(&raw), Ok(object));
        }

        /// No opening brace means no object
        #[test]
        fn prop_no_open_brace(raw in "[^{]*") {
            prop_assert_eq!(extract_json(&raw), Err(ExtractionError::NoJsonObject));
        }

        /// No closing brace means no object
        #[test]
        fn prop_no_close_brace(raw in "[^}]*") {
            prop_assert_eq!(extract_json(&raw), Err(ExtractionError::NoJsonObject));
        }

        /// A slice that is not JSON is reported, never repaired
        #[test]
        fn prop_invalid_slice(prefix in prose_strategy(), body in "[a-z]{1,20}") {
            let raw = format!("{}{{{}}}", prefix, body);
            prop_assert!(matches!(extract_json(&raw), Err(ExtractionError::InvalidJson(_))));
        }

        /// Arbitrary text never panics the typed extractor
        #[test]
        fn prop_extract_total(raw in any::<String>()) {
            let _ = extract(&raw, &CropRecommendationShape);
            let _ = extract(&raw, &NitrateStatusShape { measured_ppm: 20.0 });
        }

        /// Prompt rendering is deterministic
        #[test]
        fn prop_prompt_idempotent(
            soil_type in "[A-Za-z ]{1,30}",
            crop_name in "[A-Za-z ]{1,30}",
            readings in reading_strategy()
        ) {
            let crop = AdvisoryParams::CropRecommendation(CropParams { soil_type: soil_type.clone() });
            prop_assert_eq!(build_prompt(&crop, &readings), build_prompt(&crop, &readings));

            let nutrient = AdvisoryParams::NutrientPlan(NutrientParams {
                crop_name,
                soil_type,
                season: "Dry".to_string(),
                zone: "Zone III".to_string(),
            });
            let first = build_prompt(&nutrient, &readings);
            let second = build_prompt(&nutrient.clone(), &readings);
            prop_assert_eq!(first.as_str(), second.as_str());
        }
    }
}
