//! Shared types and models for the agricultural advisory platform
//!
//! This crate holds everything that does not need I/O: the domain models,
//! request validation, prompt rendering and model-reply extraction. The
//! backend wires these into HTTP handlers and upstream clients.

pub mod extract;
pub mod models;
pub mod prompt;
pub mod types;
pub mod validation;

pub use extract::{extract, extract_json, locate_json_object, ExpectedShape, ExtractionError};
pub use models::*;
pub use prompt::{
    build_prompt, AdvisoryParams, CropParams, IrrigationParams, NutrientParams, PromptText,
    SoilImageParams,
};
pub use types::*;
pub use validation::*;
