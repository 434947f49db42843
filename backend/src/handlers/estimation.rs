//! HTTP handlers for purchase estimation

use axum::{response::IntoResponse, Json};

use crate::{error::AppResult, models::EstimationInput, services::EstimationService};

/// Calculate purchase estimation totals
pub async fn calculate_estimation(
    Json(input): Json<EstimationInput>,
) -> AppResult<impl IntoResponse> {
    let totals = EstimationService::new().calculate(input)?;
    Ok(Json(totals))
}
