//! PostgreSQL advisory store tests
//!
//! Need a disposable database: set `DATABASE_URL` and run with
//! `cargo test --test store_tests -- --ignored`.
//! - one row per list item, in order
//! - rollback of every row when one insert fails
//! - NULL readings for soil uploads without coordinates

use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use agri_advisor_backend::error::AppError;
use agri_advisor_backend::services::{
    AdvisoryRecord, AdvisoryStore, PgAdvisoryStore, SimulatedReadingProvider,
};
use shared::{
    AdvisoryParams, AdvisoryResult, CropParams, CropRecommendation, CropRecommendationSet,
    GpsCoordinates, ResultSource, SoilClassification, SoilImageParams,
};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// Insert a user owning one farm
async fn seed_farm(pool: &PgPool) -> (Uuid, Uuid) {
    let (user_id, farm_id) = (Uuid::new_v4(), Uuid::new_v4());
    sqlx::query("INSERT INTO users (id, email, full_name) VALUES ($1, $2, 'Store Test')")
        .bind(user_id)
        .bind(format!("{}@example.test", user_id))
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO farms (id, owner_id, name) VALUES ($1, $2, 'Test Farm')")
        .bind(farm_id)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
    (user_id, farm_id)
}

fn crop(name: &str, score: f64) -> CropRecommendation {
    CropRecommendation {
        crop_name: name.to_string(),
        reasoning: format!("{} suits the soil.", name),
        suitability_score: score,
    }
}

fn crop_record(
    user_id: Uuid,
    farm_id: Uuid,
    recommendations: Vec<CropRecommendation>,
) -> AdvisoryRecord {
    let location = GpsCoordinates::new(-15.4, 28.3);
    AdvisoryRecord {
        farm_id,
        user_id,
        params: AdvisoryParams::CropRecommendation(CropParams {
            soil_type: "Loamy Soil".to_string(),
        }),
        readings: Some(SimulatedReadingProvider::simulate(location, Utc::now().date_naive())),
        result: AdvisoryResult::CropRecommendation(CropRecommendationSet { recommendations }),
        source: ResultSource::Model,
        prompt_sha256: "a".repeat(64),
        created_at: Utc::now(),
    }
}

async fn crop_rows(pool: &PgPool, farm_id: Uuid) -> Vec<(String, i32)> {
    sqlx::query_as::<_, (String, i32)>(
        "SELECT crop_name, item_index FROM crop_recommendations WHERE farm_id = $1 ORDER BY item_index",
    )
    .bind(farm_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_crop_set_fans_out_one_row_per_item() {
    let pool = pool().await;
    let (user_id, farm_id) = seed_farm(&pool).await;
    let store = PgAdvisoryStore::new(pool.clone());

    let record = crop_record(
        user_id,
        farm_id,
        vec![crop("Maize", 0.95), crop("Sorghum", 0.88), crop("Groundnuts", 0.8)],
    );
    store.save(&record).await.unwrap();

    let rows = crop_rows(&pool, farm_id).await;
    assert_eq!(
        rows,
        vec![
            ("Maize".to_string(), 0),
            ("Sorghum".to_string(), 1),
            ("Groundnuts".to_string(), 2)
        ]
    );

    let digests: Vec<String> = sqlx::query_scalar(
        "SELECT prompt_sha256 FROM crop_recommendations WHERE farm_id = $1",
    )
    .bind(farm_id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(digests.iter().all(|d| d == &record.prompt_sha256));
}

#[tokio::test]
#[ignore]
async fn test_failed_insert_rolls_back_whole_result() {
    let pool = pool().await;
    let (user_id, farm_id) = seed_farm(&pool).await;
    let store = PgAdvisoryStore::new(pool.clone());

    // The second row violates the suitability_score check
    let record = crop_record(
        user_id,
        farm_id,
        vec![crop("Maize", 0.95), crop("Sorghum", 1.5), crop("Cassava", 0.7)],
    );
    let err = store.save(&record).await.unwrap_err();

    assert!(matches!(err, AppError::Persistence(_)));
    assert!(crop_rows(&pool, farm_id).await.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_soil_without_location_stores_null_readings() {
    let pool = pool().await;
    let (user_id, farm_id) = seed_farm(&pool).await;
    let store = PgAdvisoryStore::new(pool.clone());

    let record = AdvisoryRecord {
        farm_id,
        user_id,
        params: AdvisoryParams::SoilClassification(SoilImageParams {
            image_filename: "plot-7.jpg".to_string(),
        }),
        readings: None,
        result: AdvisoryResult::SoilClassification(SoilClassification {
            soil_type: "Unknown".to_string(),
            confidence: 0.0,
            message: "Could not parse API response.".to_string(),
        }),
        source: ResultSource::ExtractionFallback,
        prompt_sha256: "b".repeat(64),
        created_at: Utc::now(),
    };
    store.save(&record).await.unwrap();

    let (readings_missing, message): (bool, String) = sqlx::query_as(
        "SELECT readings IS NULL, message FROM soil_analyses WHERE farm_id = $1",
    )
    .bind(farm_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(readings_missing);
    assert_eq!(message, "Could not parse API response.");
}
