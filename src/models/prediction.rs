// src/models/prediction.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Direction of a cohort's accuracy over the grouped history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Improving,
    Declining,
}

/// Diagnostics derived from quiz activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Topics of the current quiz below the weak-area threshold, in topic order.
    pub weak_areas: Vec<String>,
    pub improvement_trend: Trend,
    /// Mean historical accuracy across every user, not only the requested one.
    pub overall_accuracy: f64,
}

/// Response body of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_rank: i64,
    pub insights: Insights,
}

/// DTO for requesting a prediction.
#[derive(Debug, Deserialize, Validate)]
pub struct PredictRequest {
    #[serde(rename = "userId")]
    #[validate(length(
        min = 1,
        max = 128,
        message = "userId length must be between 1 and 128 characters."
    ))]
    pub user_id: String,
}
