//! Business logic services for the agricultural advisory platform

pub mod advisory;
pub mod farm;
pub mod irrigation;
pub mod pipeline;
pub mod readings;
pub mod store;

pub use advisory::AdvisoryServices;
pub use farm::{FarmDirectory, PgFarmDirectory};
pub use irrigation::{IrrigationController, LoggingIrrigationController};
pub use pipeline::{AdvisoryPipeline, AdvisoryRun, RequestContext};
pub use readings::{ReadingProvider, SimulatedReadingProvider};
pub use store::{AdvisoryRecord, AdvisoryStore, PgAdvisoryStore};
