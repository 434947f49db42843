//! HTTP handlers for production management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CreateProductionInput, StageSubmission, UpdateProductionInput},
    services::ProductionService,
    AppState,
};

fn service(state: &AppState) -> ProductionService {
    ProductionService::new(state.db.clone(), state.pipeline.clone())
}

/// Create a production order
pub async fn create_production(
    State(state): State<AppState>,
    Json(input): Json<CreateProductionInput>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state).create_production(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// List all production orders
pub async fn list_productions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let records = service(&state).list_productions().await?;
    Ok(Json(records))
}

/// Get production order by ID
pub async fn get_production(
    State(state): State<AppState>,
    Path(production_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state).get_production(production_id).await?;
    Ok(Json(record))
}

/// Update a production order
pub async fn update_production(
    State(state): State<AppState>,
    Path(production_id): Path<Uuid>,
    Json(input): Json<UpdateProductionInput>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state)
        .update_production(production_id, input)
        .await?;
    Ok(Json(record))
}

/// Delete a production order
pub async fn delete_production(
    State(state): State<AppState>,
    Path(production_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    service(&state).delete_production(production_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the configured stage pipeline
pub async fn stage_pipeline(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.pipeline.stages().to_vec())
}

/// Records visible on a stage screen
pub async fn stage_view(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> AppResult<impl IntoResponse> {
    let view = service(&state).stage_view(&stage).await?;
    Ok(Json(view))
}

/// Submit a stage form for a production order
pub async fn submit_stage(
    State(state): State<AppState>,
    Path((production_id, stage)): Path<(Uuid, String)>,
    Json(submission): Json<StageSubmission>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state)
        .submit_stage(production_id, &stage, submission)
        .await?;
    Ok(Json(record))
}
