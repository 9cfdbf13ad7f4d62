// src/pipeline/history.rs

use std::collections::BTreeMap;

use crate::{
    error::PipelineError,
    models::exam_record::{HistoricalAttempt, UserHistorySummary},
};

/// Share of correctly answered questions in one attempt.
///
/// An attempt without answered questions has no accuracy and is reported as
/// `DivisionUndefined` instead of producing NaN.
pub fn attempt_accuracy(attempt: &HistoricalAttempt) -> Result<f64, PipelineError> {
    let total = attempt.responses.total_questions();
    if total == 0 {
        return Err(PipelineError::DivisionUndefined {
            user_id: attempt.user_id.clone(),
        });
    }
    Ok(attempt.responses.correct_count() as f64 / total as f64)
}

/// Averages score and accuracy per user, one row per distinct user ordered by user id.
pub fn aggregate_history(
    attempts: &[HistoricalAttempt],
) -> Result<Vec<UserHistorySummary>, PipelineError> {
    // user -> (score sum, accuracy sum, attempts)
    let mut groups: BTreeMap<&str, (f64, f64, usize)> = BTreeMap::new();

    for attempt in attempts {
        let accuracy = attempt_accuracy(attempt)?;
        let entry = groups.entry(attempt.user_id.as_str()).or_insert((0.0, 0.0, 0));
        entry.0 += attempt.score;
        entry.1 += accuracy;
        entry.2 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(user_id, (score, accuracy, count))| UserHistorySummary {
            user_id: user_id.to_string(),
            score: score / count as f64,
            accuracy: accuracy / count as f64,
        })
        .collect())
}
