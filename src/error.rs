// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Failures of one prediction run.
/// None of them is retried; each ends the current request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A record is missing a required field or has the wrong shape.
    #[error("malformed {dataset} data: {message}")]
    DataFormat {
        dataset: &'static str,
        message: String,
    },

    /// Joining history with exam results left nothing to train on.
    #[error("no user appears in both the quiz history and the exam results")]
    EmptyDataset,

    #[error("{rows} training rows are not enough to split into training and holdout sets")]
    InsufficientData { rows: usize },

    #[error("user '{0}' has no training data")]
    UnknownUser(String),

    /// A historical attempt answered zero questions, so its accuracy has no value.
    #[error("historical attempt of user '{user_id}' contains no answered questions")]
    DivisionUndefined { user_id: String },

    #[error("failed to fetch {dataset}: {message}")]
    Fetch {
        dataset: &'static str,
        message: String,
    },

    /// The blocking training task panicked or was cancelled.
    #[error("prediction task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::DataFormat { .. } => "data_format",
            PipelineError::EmptyDataset => "empty_dataset",
            PipelineError::InsufficientData { .. } => "insufficient_data",
            PipelineError::UnknownUser(_) => "unknown_user",
            PipelineError::DivisionUndefined { .. } => "division_undefined",
            PipelineError::Fetch { .. } => "fetch",
            PipelineError::Task(_) => "internal",
        }
    }
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 400 Bad Request
    BadRequest(String),

    // Pipeline failures keep their own status mapping
    Pipeline(PipelineError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Pipeline(err) => write!(f, "{err}"),
            other => write!(f, "{:?}", other),
        }
    }
}

impl std::error::Error for AppError {}

fn pipeline_status(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::UnknownUser(_) => StatusCode::NOT_FOUND,
        PipelineError::Fetch { .. } | PipelineError::DataFormat { .. } => StatusCode::BAD_GATEWAY,
        PipelineError::EmptyDataset
        | PipelineError::InsufficientData { .. }
        | PipelineError::DivisionUndefined { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Pipeline(err) => {
                tracing::warn!(kind = err.kind(), "Prediction failed: {}", err);
                (pipeline_status(&err), err.kind(), err.to_string())
            }
        };
        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

/// Malformed or incomplete request bodies are client errors, not pipeline failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Allows using `?` on pipeline calls inside handlers.
impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Pipeline(err)
    }
}
