//! Append-only persistence of advisory outcomes
//!
//! One advisory result is written inside one transaction: list results get
//! one row per item, single results one row. Every row carries the reading
//! bundle and the SHA-256 digest of the prompt that produced it. Soil
//! analyses uploaded without coordinates store `NULL` readings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgConnection, PgPool};
use uuid::Uuid;

use shared::{
    AdvisoryParams, AdvisoryResult, CropRecommendationSet, IrrigationSchedule, NitrateStatus,
    NutrientPlan, ReadingBundle, ResultSource, SoilClassification,
};

use crate::error::{AppError, AppResult};

/// Everything needed to persist one advisory outcome
#[derive(Debug, Clone)]
pub struct AdvisoryRecord {
    pub farm_id: Uuid,
    pub user_id: Uuid,
    pub params: AdvisoryParams,
    /// `None` when the request carried no coordinates
    pub readings: Option<ReadingBundle>,
    pub result: AdvisoryResult,
    pub source: ResultSource,
    /// Hex SHA-256 of the exact prompt text
    pub prompt_sha256: String,
    pub created_at: DateTime<Utc>,
}

/// Storage for advisory outcomes
#[async_trait]
pub trait AdvisoryStore: Send + Sync {
    async fn save(&self, record: &AdvisoryRecord) -> AppResult<()>;
}

/// PostgreSQL advisory store
#[derive(Clone)]
pub struct PgAdvisoryStore {
    db: PgPool,
}

impl PgAdvisoryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn persistence_error(e: sqlx::Error) -> AppError {
    AppError::Persistence(e.to_string())
}

#[async_trait]
impl AdvisoryStore for PgAdvisoryStore {
    async fn save(&self, record: &AdvisoryRecord) -> AppResult<()> {
        let mut tx = self.db.begin().await.map_err(persistence_error)?;

        let written = match &record.result {
            AdvisoryResult::CropRecommendation(set) => insert_crops(&mut tx, record, set).await,
            AdvisoryResult::NutrientPlan(plan) => insert_nutrient_plan(&mut tx, record, plan).await,
            AdvisoryResult::IrrigationSchedule(schedule) => {
                insert_irrigation_schedule(&mut tx, record, schedule).await
            }
            AdvisoryResult::NitrateStatus(status) => {
                insert_nitrate_log(&mut tx, record, status).await
            }
            AdvisoryResult::SoilClassification(soil) => {
                insert_soil_analysis(&mut tx, record, soil).await
            }
        };
        // Dropping the transaction on error rolls it back
        written.map_err(persistence_error)?;

        tx.commit().await.map_err(persistence_error)?;

        tracing::info!(
            farm_id = %record.farm_id,
            feature = %record.result.feature(),
            source = record.source.as_str(),
            "Advisory result stored"
        );
        Ok(())
    }
}

async fn insert_crops(
    conn: &mut PgConnection,
    record: &AdvisoryRecord,
    set: &CropRecommendationSet,
) -> Result<(), sqlx::Error> {
    let soil_type = record.params.soil_type().unwrap_or_default();

    for (index, rec) in set.recommendations.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO crop_recommendations (id, farm_id, user_id, soil_type, crop_name,
                                              reasoning, suitability_score, item_index,
                                              latitude, longitude, readings, source,
                                              prompt_sha256, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.farm_id)
        .bind(record.user_id)
        .bind(soil_type)
        .bind(&rec.crop_name)
        .bind(&rec.reasoning)
        .bind(rec.suitability_score)
        .bind(index as i32)
        .bind(record.readings.map(|r| r.latitude))
        .bind(record.readings.map(|r| r.longitude))
        .bind(record.readings.map(Json))
        .bind(record.source.as_str())
        .bind(&record.prompt_sha256)
        .bind(record.created_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_nutrient_plan(
    conn: &mut PgConnection,
    record: &AdvisoryRecord,
    plan: &NutrientPlan,
) -> Result<(), sqlx::Error> {
    let (crop_name, soil_type, season, zone) = match &record.params {
        AdvisoryParams::NutrientPlan(p) => (
            p.crop_name.as_str(),
            p.soil_type.as_str(),
            p.season.as_str(),
            p.zone.as_str(),
        ),
        _ => ("", "", "", ""),
    };

    for (index, rec) in plan.plan_details.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO nutrient_plans (id, farm_id, user_id, crop_name, soil_type, season, zone,
                                        fertilizer_type, application_stage, quantity_per_acre_kg,
                                        notes, item_index, latitude, longitude, readings, source,
                                        prompt_sha256, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.farm_id)
        .bind(record.user_id)
        .bind(crop_name)
        .bind(soil_type)
        .bind(season)
        .bind(zone)
        .bind(&rec.fertilizer_type)
        .bind(&rec.application_stage)
        .bind(rec.quantity_per_acre_kg)
        .bind(&rec.notes)
        .bind(index as i32)
        .bind(record.readings.map(|r| r.latitude))
        .bind(record.readings.map(|r| r.longitude))
        .bind(record.readings.map(Json))
        .bind(record.source.as_str())
        .bind(&record.prompt_sha256)
        .bind(record.created_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_irrigation_schedule(
    conn: &mut PgConnection,
    record: &AdvisoryRecord,
    schedule: &IrrigationSchedule,
) -> Result<(), sqlx::Error> {
    let crop_name = record.params.crop_name().unwrap_or_default();
    let soil_type = record.params.soil_type().unwrap_or_default();

    for (index, event) in schedule.schedule.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO irrigation_schedules (id, farm_id, user_id, crop_name, soil_type,
                                              irrigation_date, duration_minutes, water_amount_mm,
                                              reasoning, item_index, latitude, longitude, readings,
                                              source, prompt_sha256, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.farm_id)
        .bind(record.user_id)
        .bind(crop_name)
        .bind(soil_type)
        .bind(event.next_irrigation_date)
        .bind(event.duration_minutes)
        .bind(event.water_amount_mm)
        .bind(&event.reasoning)
        .bind(index as i32)
        .bind(record.readings.map(|r| r.latitude))
        .bind(record.readings.map(|r| r.longitude))
        .bind(record.readings.map(Json))
        .bind(record.source.as_str())
        .bind(&record.prompt_sha256)
        .bind(record.created_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_nitrate_log(
    conn: &mut PgConnection,
    record: &AdvisoryRecord,
    status: &NitrateStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO nitrate_logs (id, farm_id, user_id, nitrate_ppm, risk_level, alert_message,
                                  notes, latitude, longitude, readings, source, prompt_sha256,
                                  created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(record.farm_id)
    .bind(record.user_id)
    .bind(status.current_nitrate_level_ppm)
    .bind(status.alert.risk_level.as_str())
    .bind(&status.alert.message)
    .bind(&status.notes)
    .bind(record.readings.map(|r| r.latitude))
    .bind(record.readings.map(|r| r.longitude))
    .bind(record.readings.map(Json))
    .bind(record.source.as_str())
    .bind(&record.prompt_sha256)
    .bind(record.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn insert_soil_analysis(
    conn: &mut PgConnection,
    record: &AdvisoryRecord,
    soil: &SoilClassification,
) -> Result<(), sqlx::Error> {
    let image_filename = match &record.params {
        AdvisoryParams::SoilClassification(p) => p.image_filename.as_str(),
        _ => "",
    };

    sqlx::query(
        r#"
        INSERT INTO soil_analyses (id, farm_id, user_id, image_filename, soil_type, confidence,
                                   message, readings, source, prompt_sha256, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(record.farm_id)
    .bind(record.user_id)
    .bind(image_filename)
    .bind(&soil.soil_type)
    .bind(soil.confidence)
    .bind(&soil.message)
    .bind(record.readings.map(Json))
    .bind(record.source.as_str())
    .bind(&record.prompt_sha256)
    .bind(record.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
