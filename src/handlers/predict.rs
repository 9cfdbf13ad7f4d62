// src/handlers/predict.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use validator::Validate;

use crate::{error::AppError, models::prediction::PredictRequest, pipeline::Pipeline};

/// Predicts the exam rank of a user and attaches quiz insights.
///
/// * Validates the request body; unreadable bodies are rejected as bad requests.
/// * Refetches all datasets and retrains the model for this request only.
/// * Maps each pipeline failure to its own status code.
pub async fn predict(
    State(pipeline): State<Arc<Pipeline>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let result = pipeline.predict_for_user(&req.user_id).await?;
    tracing::info!(
        user_id = %req.user_id,
        predicted_rank = result.predicted_rank,
        "Prediction served"
    );

    Ok(Json(result))
}

/// Liveness check.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
