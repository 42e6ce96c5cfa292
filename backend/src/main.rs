//! Agricultural advisory backend server

use std::{net::SocketAddr, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agri_advisor_backend::{
    create_app,
    external::{GeminiClient, OpenMeteoClient},
    services::{
        AdvisoryPipeline, AdvisoryServices, LoggingIrrigationController, PgAdvisoryStore,
        PgFarmDirectory, SimulatedReadingProvider,
    },
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "agri_server=debug,agri_advisor_backend=debug,tower_http=debug,sqlx=warn".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Agri Advisory Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.is_development() {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Upstream clients are built once and shared
    let gateway = GeminiClient::new(&config.gemini).map_err(|e| {
        tracing::error!("Model client unavailable: {}", e);
        e
    })?;
    let weather = OpenMeteoClient::new(&config.weather)?;
    tracing::info!("Using model {}", config.gemini.model);

    let pipeline = AdvisoryPipeline::new(
        Arc::new(gateway),
        Arc::new(SimulatedReadingProvider::new()),
        Arc::new(PgFarmDirectory::new(db_pool.clone())),
        Arc::new(PgAdvisoryStore::new(db_pool.clone())),
    );
    let services = AdvisoryServices::new(
        pipeline,
        Arc::new(weather),
        Arc::new(LoggingIrrigationController),
    );

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
