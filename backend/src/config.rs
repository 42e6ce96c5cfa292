//! Configuration management for the agricultural advisory backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRI_ prefix
//!    (e.g. `AGRI__GEMINI__API_KEY`)

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT verification configuration
    pub jwt: JwtConfig,

    /// Generative model configuration
    pub gemini: GeminiConfig,

    /// Weather forecast configuration
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Maximum accepted upload size for soil images, in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key used to verify bearer tokens
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,

    /// Model name, e.g. `gemini-1.5-flash-latest`
    pub model: String,

    /// REST base URL up to and including the API version
    pub base_url: String,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Open-Meteo base URL
    pub base_url: String,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,

    /// Number of forecast days requested
    pub forecast_days: u8,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("gemini.api_key", "")?
            .set_default("gemini.model", "gemini-1.5-flash-latest")?
            .set_default(
                "gemini.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("gemini.timeout_secs", 10)?
            .set_default("weather.base_url", "https://api.open-meteo.com/v1")?
            .set_default("weather.timeout_secs", 10)?
            .set_default("weather.forecast_days", 7)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRI_ prefix)
            .add_source(
                Environment::with_prefix("AGRI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "gemini.api_key is not set (AGRI__GEMINI__API_KEY)".to_string(),
            ));
        }
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret is not set (AGRI__JWT__SECRET)".to_string(),
            ));
        }
        if self.weather.forecast_days == 0 || self.weather.forecast_days > 16 {
            return Err(ConfigError::Message(
                "weather.forecast_days must be between 1 and 16".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}
