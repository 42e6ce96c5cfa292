//! Advisory services
//!
//! One entry point per feature. Each builds its feature parameters and
//! expected shape and hands them to the shared [`AdvisoryPipeline`].

use std::sync::Arc;

use chrono::Utc;

use shared::extract::{
    CropRecommendationShape, IrrigationScheduleShape, NitrateStatusShape, NutrientPlanShape,
    SoilClassificationShape,
};
use shared::{
    AdvisoryParams, CropParams, CropRecommendationSet, FallbackReason, IrrigationParams,
    IrrigationSchedule, NitrateStatus, NutrientParams, NutrientPlan, ResultSource,
    SoilClassification, SoilImageParams,
};

use crate::error::{AppError, AppResult};
use crate::external::{ImageInput, WeatherProvider};
use crate::services::irrigation::IrrigationController;
use crate::services::pipeline::{AdvisoryPipeline, AdvisoryRun, RequestContext};

/// Feature services sharing one pipeline
#[derive(Clone)]
pub struct AdvisoryServices {
    pipeline: AdvisoryPipeline,
    weather: Arc<dyn WeatherProvider>,
    irrigation: Arc<dyn IrrigationController>,
}

impl AdvisoryServices {
    pub fn new(
        pipeline: AdvisoryPipeline,
        weather: Arc<dyn WeatherProvider>,
        irrigation: Arc<dyn IrrigationController>,
    ) -> Self {
        Self {
            pipeline,
            weather,
            irrigation,
        }
    }

    /// Top crop recommendations for the farm's soil and readings
    pub async fn recommend_crops(
        &self,
        ctx: &RequestContext,
        params: CropParams,
    ) -> AppResult<AdvisoryRun<CropRecommendationSet>> {
        self.pipeline
            .run(
                &CropRecommendationShape,
                ctx,
                AdvisoryParams::CropRecommendation(params),
                None,
            )
            .await
    }

    /// Fertilizer plan across growth stages for a crop
    pub async fn nutrient_plan(
        &self,
        ctx: &RequestContext,
        params: NutrientParams,
    ) -> AppResult<AdvisoryRun<NutrientPlan>> {
        self.pipeline
            .run(
                &NutrientPlanShape,
                ctx,
                AdvisoryParams::NutrientPlan(params),
                None,
            )
            .await
    }

    /// Irrigation events for the coming week.
    ///
    /// Needs the forecast as input: when it cannot be fetched the weather
    /// fallback is returned without calling the model.
    pub async fn irrigation_schedule(
        &self,
        ctx: &RequestContext,
        crop_name: String,
        soil_type: String,
    ) -> AppResult<AdvisoryRun<IrrigationSchedule>> {
        let location = ctx.location.ok_or_else(|| {
            AppError::validation("latitude", "Coordinates are required for irrigation")
        })?;
        let readings = self.pipeline.gather(ctx).await?;

        let forecast = match self.weather.daily_forecast(location).await {
            Ok(forecast) => forecast,
            Err(e) => {
                tracing::warn!(error = %e, "Weather forecast unavailable");
                let shape = IrrigationScheduleShape {
                    today: Utc::now().date_naive(),
                };
                return Ok(self
                    .pipeline
                    .degraded(&shape, FallbackReason::WeatherUnavailable, readings));
            }
        };

        let reference_date = forecast
            .first_date()
            .unwrap_or_else(|| Utc::now().date_naive());
        let shape = IrrigationScheduleShape {
            today: reference_date,
        };
        let params = AdvisoryParams::IrrigationSchedule(IrrigationParams {
            crop_name,
            soil_type,
            reference_date,
            forecast,
        });

        let run = self
            .pipeline
            .complete(&shape, ctx, params, readings, None)
            .await;

        if run.source == ResultSource::Model {
            if let Some(first) = run.result.schedule.first() {
                if let Err(e) = self.irrigation.dispatch(ctx.farm_id, first).await {
                    tracing::warn!(error = %e, "Irrigation dispatch failed");
                }
            }
        }

        Ok(run)
    }

    /// Risk assessment of the measured nitrate level
    pub async fn nitrate_status(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<AdvisoryRun<NitrateStatus>> {
        let readings = self.pipeline.gather(ctx).await?;
        let shape = NitrateStatusShape {
            measured_ppm: readings.nitrate_ppm,
        };
        Ok(self
            .pipeline
            .complete(&shape, ctx, AdvisoryParams::NitrateStatus, readings, None)
            .await)
    }

    /// Soil type from an uploaded field photo
    pub async fn classify_soil(
        &self,
        ctx: &RequestContext,
        image_filename: String,
        image: &ImageInput,
    ) -> AppResult<AdvisoryRun<SoilClassification>> {
        self.pipeline
            .run(
                &SoilClassificationShape,
                ctx,
                AdvisoryParams::SoilClassification(SoilImageParams { image_filename }),
                Some(image),
            )
            .await
    }
}
