//! Irrigation dispatch
//!
//! After a model-generated schedule is produced, its first event is handed
//! to a controller. Hardware integration does not exist yet, so the bundled
//! controller only records the command in the log.

use async_trait::async_trait;
use shared::IrrigationRecommendation;
use uuid::Uuid;

use crate::error::AppResult;

/// Receives the next irrigation event of a fresh schedule
#[async_trait]
pub trait IrrigationController: Send + Sync {
    async fn dispatch(&self, farm_id: Option<Uuid>, event: &IrrigationRecommendation)
        -> AppResult<()>;
}

/// Controller that logs commands instead of driving valves
#[derive(Debug, Clone, Default)]
pub struct LoggingIrrigationController;

#[async_trait]
impl IrrigationController for LoggingIrrigationController {
    async fn dispatch(
        &self,
        farm_id: Option<Uuid>,
        event: &IrrigationRecommendation,
    ) -> AppResult<()> {
        tracing::info!(
            farm_id = ?farm_id,
            date = %event.next_irrigation_date,
            duration_minutes = event.duration_minutes,
            water_amount_mm = event.water_amount_mm,
            "Irrigation command dispatched"
        );
        Ok(())
    }
}
