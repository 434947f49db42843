//! Route definitions for the garment production back office

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Production orders and stage screens
        .nest("/production", production_routes())
        // Purchase estimation
        .nest("/estimations", estimation_routes())
}

/// Production management routes
fn production_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_productions).post(handlers::create_production),
        )
        .route("/stages", get(handlers::stage_pipeline))
        .route("/stages/:stage", get(handlers::stage_view))
        .route(
            "/:production_id",
            get(handlers::get_production)
                .put(handlers::update_production)
                .delete(handlers::delete_production),
        )
        .route(
            "/:production_id/stages/:stage",
            post(handlers::submit_stage),
        )
}

/// Purchase estimation routes
fn estimation_routes() -> Router<AppState> {
    Router::new().route("/calculate", post(handlers::calculate_estimation))
}
