//! Prompt templates for the advisory features
//!
//! Rendering is pure text assembly: the same parameters and readings always
//! produce byte-identical prompts, which is what makes a stored prompt digest
//! useful for replaying a past advisory.
//!
//! Every template:
//! - asks for a bare JSON object (no prose, no code fences)
//! - documents one exact key structure with an example
//! - embeds the readings and request parameters the answer should cite

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{
    Feature, ReadingBundle, WeatherForecast, NITRATE_OPTIMAL_MAX_PPM, NITRATE_OPTIMAL_MIN_PPM,
    SOIL_TYPES,
};

/// Accumulated rainfall (mm) from which a forecast day is called out as rainy
pub const RAIN_SUMMARY_THRESHOLD_MM: f64 = 5.0;

const JSON_ONLY_INSTRUCTION: &str = "Respond with ONLY the JSON object. Do not include any text before or after it and do not wrap it in ```json code fences.";

/// Rendered prompt text sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptText(String);

impl PromptText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PromptText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller parameters for crop recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropParams {
    pub soil_type: String,
}

/// Caller parameters for nutrient plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientParams {
    pub crop_name: String,
    pub soil_type: String,
    pub season: String,
    /// Agro-ecological zone, e.g. "Zone IIa"
    pub zone: String,
}

/// Caller parameters plus forecast for irrigation schedules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationParams {
    pub crop_name: String,
    pub soil_type: String,
    /// Day the schedule starts from; example dates are derived from it
    pub reference_date: NaiveDate,
    pub forecast: WeatherForecast,
}

/// Caller parameters for soil image classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilImageParams {
    pub image_filename: String,
}

/// Feature-specific inputs to the prompt builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "feature", rename_all = "snake_case")]
pub enum AdvisoryParams {
    CropRecommendation(CropParams),
    NutrientPlan(NutrientParams),
    IrrigationSchedule(IrrigationParams),
    NitrateStatus,
    SoilClassification(SoilImageParams),
}

impl AdvisoryParams {
    pub fn feature(&self) -> Feature {
        match self {
            AdvisoryParams::CropRecommendation(_) => Feature::CropRecommendation,
            AdvisoryParams::NutrientPlan(_) => Feature::NutrientPlan,
            AdvisoryParams::IrrigationSchedule(_) => Feature::IrrigationSchedule,
            AdvisoryParams::NitrateStatus => Feature::NitrateStatus,
            AdvisoryParams::SoilClassification(_) => Feature::SoilClassification,
        }
    }

    pub fn crop_name(&self) -> Option<&str> {
        match self {
            AdvisoryParams::NutrientPlan(p) => Some(&p.crop_name),
            AdvisoryParams::IrrigationSchedule(p) => Some(&p.crop_name),
            _ => None,
        }
    }

    pub fn soil_type(&self) -> Option<&str> {
        match self {
            AdvisoryParams::CropRecommendation(p) => Some(&p.soil_type),
            AdvisoryParams::NutrientPlan(p) => Some(&p.soil_type),
            AdvisoryParams::IrrigationSchedule(p) => Some(&p.soil_type),
            _ => None,
        }
    }
}

/// Render the prompt for a feature from its parameters and the reading bundle
pub fn build_prompt(params: &AdvisoryParams, readings: &ReadingBundle) -> PromptText {
    let text = match params {
        AdvisoryParams::CropRecommendation(p) => crop_prompt(p, readings),
        AdvisoryParams::NutrientPlan(p) => nutrient_prompt(p, readings),
        AdvisoryParams::IrrigationSchedule(p) => irrigation_prompt(p, readings),
        AdvisoryParams::NitrateStatus => nitrate_prompt(readings),
        AdvisoryParams::SoilClassification(_) => soil_prompt(),
    };
    PromptText(text)
}

fn sensor_block(r: &ReadingBundle) -> String {
    format!(
        "Real-Time Sensor Readings:\n\
         - Soil Moisture: {}%\n\
         - Soil Temperature: {}°C\n\
         - Electrical Conductivity (Salinity): {} dS/m\n\
         - Soil pH: {}\n\
         - Relative Humidity: {}%\n\
         - Solar Radiation: {} W/m^2\n\
         - Nitrate Level: {} ppm",
        r.soil_moisture,
        r.soil_temperature,
        r.electrical_conductivity,
        r.soil_ph,
        r.relative_humidity,
        r.solar_radiation,
        r.nitrate_ppm,
    )
}

fn crop_prompt(p: &CropParams, r: &ReadingBundle) -> String {
    const EXAMPLE: &str = r#"{
  "recommendations": [
    {
      "crop_name": "Maize",
      "reasoning": "Maize is highly suitable for the current loamy soil and is a staple crop in Zambia. The sensor data indicates optimal moisture and pH levels for its growth.",
      "suitability_score": 0.95
    },
    {
      "crop_name": "Sorghum",
      "reasoning": "Sorghum is drought-resistant, making it a good secondary option. It tolerates the high solar radiation and is less sensitive to variations in soil moisture.",
      "suitability_score": 0.88
    }
  ]
}"#;

    format!(
        "You are an expert agronomist for small-scale farming in Zambia.\n\
         Your task is to provide a list of the top 3 optimal crop recommendations for a farm based on its soil type and current sensor data.\n\
         For each recommendation, provide a detailed reasoning and a suitability score from 0 to 1.\n\
         \n\
         Conditions:\n\
         - Soil Type: {soil_type}\n\
         - Location: {location}\n\
         \n\
         {sensors}\n\
         \n\
         The response must be a JSON object with a single key 'recommendations' that contains a list of 3 objects, each with 'crop_name' (string), 'reasoning' (string) and 'suitability_score' (number between 0 and 1).\n\
         {json_only}\n\
         \n\
         Example JSON structure:\n\
         {example}\n",
        soil_type = p.soil_type,
        location = r.location(),
        sensors = sensor_block(r),
        json_only = JSON_ONLY_INSTRUCTION,
        example = EXAMPLE,
    )
}

fn nutrient_prompt(p: &NutrientParams, r: &ReadingBundle) -> String {
    const EXAMPLE: &str = r#"{
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

    format!(
        "You are an expert agricultural consultant specializing in soil and nutrient management for farmers in Zambia.\n\
         Based on the following farm conditions and real-time sensor data, create a detailed nutrient plan for the specified crop.\n\
         \n\
         Conditions:\n\
         - Crop: {crop}\n\
         - Soil Type: {soil_type}\n\
         - Current Season: {season}\n\
         - Agro-ecological Zone: {zone}\n\
         - Location: {location}\n\
         \n\
         {sensors}\n\
         \n\
         Your response must contain a list of fertilizer recommendations covering different growth stages. Include both synthetic and organic fertilizer options where appropriate. For each recommendation, specify:\n\
         1. The type of fertilizer (e.g., \"Urea\", \"Compost\").\n\
         2. The growth stage for application (e.g., \"Planting\", \"Vegetative Stage\", \"Flowering\").\n\
         3. The recommended quantity in kilograms per acre (kg/acre), as a non-negative number.\n\
         4. Any additional notes or instructions, especially how the recommendation relates to the sensor readings.\n\
         \n\
         The response must be a JSON object with a single key 'plan_details' containing a list of objects with the keys 'fertilizer_type', 'application_stage', 'quantity_per_acre_kg' and 'notes'.\n\
         {json_only}\n\
         \n\
         Example JSON structure:\n\
         {example}\n",
        crop = p.crop_name,
        soil_type = p.soil_type,
        season = p.season,
        zone = p.zone,
        location = r.location(),
        sensors = sensor_block(r),
        json_only = JSON_ONLY_INSTRUCTION,
        example = EXAMPLE,
    )
}

fn rain_summary(forecast: &WeatherForecast) -> String {
    let rainy: Vec<String> = forecast
        .rainy_days(RAIN_SUMMARY_THRESHOLD_MM)
        .iter()
        .map(|day| day.date.to_string())
        .collect();
    if rainy.is_empty() {
        "none".to_string()
    } else {
        rainy.join(", ")
    }
}

fn irrigation_prompt(p: &IrrigationParams, r: &ReadingBundle) -> String {
    let first_date = p.reference_date;
    let follow_up = p.reference_date + Duration::days(3);
    // Pretty JSON keeps the forecast readable for the model; field order is
    // fixed by the struct definition.
    let forecast_json = serde_json::to_string_pretty(&p.forecast).unwrap_or_default();
    let example = format!(
        r#"{{
  "schedule": [
    {{
      "next_irrigation_date": "{first_date}",
      "duration_minutes": 30.0,
      "water_amount_mm": 15.0,
      "reasoning": "Current soil moisture is low ({moisture}%) and no significant rain is expected for the next 2 days based on the forecast."
    }},
    {{
      "next_irrigation_date": "{follow_up}",
      "duration_minutes": 20.0,
      "water_amount_mm": 10.0,
      "reasoning": "Follow-up irrigation needed due to anticipated dry conditions and {crop}'s water requirements, despite a slight chance of rain on day 2."
    }}
  ]
}}"#,
        first_date = first_date,
        follow_up = follow_up,
        moisture = r.soil_moisture,
        crop = p.crop_name,
    );

    format!(
        "You are an expert agricultural engineer specializing in irrigation management for small-scale farms in Zambia.\n\
         Your task is to provide an optimal irrigation schedule for the next 7 days starting {start} for the specified crop, considering the current conditions, real-time sensor data, and weather forecasts.\n\
         \n\
         Conditions:\n\
         - Crop: {crop}\n\
         - Soil Type: {soil_type}\n\
         - Location: {location}\n\
         \n\
         {sensors}\n\
         \n\
         Weather Forecast for the Next 7 Days:\n\
         {forecast}\n\
         \n\
         Days with expected rain (at least {threshold} mm or a 50% chance): {rainy}\n\
         \n\
         Based on this information, recommend specific irrigation events. For each event, specify:\n\
         1. The 'next_irrigation_date' (in YYYY-MM-DD format).\n\
         2. The 'duration_minutes' (how long to irrigate in minutes, non-negative).\n\
         3. The 'water_amount_mm' (estimated water delivered in millimeters, non-negative).\n\
         4. A 'reasoning' explaining why this schedule is recommended, referencing the provided data points.\n\
         \n\
         Provide 3 to 5 irrigation events for the upcoming week.\n\
         The response must be a JSON object with a single key 'schedule' containing a list of these recommendations.\n\
         {json_only}\n\
         \n\
         Example JSON structure:\n\
         {example}\n",
        start = first_date,
        crop = p.crop_name,
        soil_type = p.soil_type,
        location = r.location(),
        sensors = sensor_block(r),
        forecast = forecast_json,
        threshold = RAIN_SUMMARY_THRESHOLD_MM,
        rainy = rain_summary(&p.forecast),
        json_only = JSON_ONLY_INSTRUCTION,
        example = example,
    )
}

fn nitrate_prompt(r: &ReadingBundle) -> String {
    let example = format!(
        r#"{{
  "current_nitrate_level_ppm": {level},
  "alert": {{
    "risk_level": "Optimal",
    "message": "Current nitrate levels are within the optimal range."
  }},
  "notes": "No immediate action is required. Monitor regularly."
}}"#,
        level = r.nitrate_ppm,
    );

    format!(
        "You are a soil and crop expert. Analyze the following nitrate level and provide a risk assessment and notes.\n\
         \n\
         Nitrate Level: {level} ppm\n\
         Location: {location}\n\
         Soil Moisture: {moisture}%\n\
         Soil Temperature: {temperature}°C\n\
         Soil pH: {ph}\n\
         \n\
         - If the level is between {min}-{max} ppm, classify it as \"Optimal\" with notes on maintenance.\n\
         - If the level is below {min} ppm, classify it as \"Low\" and recommend a light nitrogen fertilizer application.\n\
         - If the level is above {max} ppm, classify it as \"High\" and advise on potential leaching or crop damage.\n\
         \n\
         The response must be a JSON object with the keys 'current_nitrate_level_ppm' (number), 'alert' (an object with 'risk_level' and 'message') and 'notes' (string).\n\
         {json_only}\n\
         \n\
         Example response:\n\
         {example}\n",
        level = r.nitrate_ppm,
        location = r.location(),
        moisture = r.soil_moisture,
        temperature = r.soil_temperature,
        ph = r.soil_ph,
        min = NITRATE_OPTIMAL_MIN_PPM,
        max = NITRATE_OPTIMAL_MAX_PPM,
        json_only = JSON_ONLY_INSTRUCTION,
        example = example,
    )
}

fn soil_prompt() -> String {
    format!(
        "Analyze the following image of soil. Identify the primary soil type (one of: {types}).\n\
         Also, provide a confidence level for your classification on a scale of 0 to 100.\n\
         Respond in a JSON format with 'soil_type' and 'confidence' keys.\n\
         {json_only}\n\
         Example: {{\"soil_type\": \"Loamy Soil\", \"confidence\": 90}}\n",
        types = SOIL_TYPES.join(", "),
        json_only = JSON_ONLY_INSTRUCTION,
    )
}
