//! Route definitions for the agricultural advisory API

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - advisory features
        .merge(advisory_routes(state))
}

/// Advisory routes (protected)
fn advisory_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/crop/recommend", post(handlers::recommend_crops))
        .route("/nutrient/plan", post(handlers::create_nutrient_plan))
        .route(
            "/irrigation/schedule",
            post(handlers::create_irrigation_schedule),
        )
        .route("/nitrate/status", get(handlers::get_nitrate_status))
        .route(
            "/soil/analyze-image",
            post(handlers::analyze_soil_image)
                .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}
