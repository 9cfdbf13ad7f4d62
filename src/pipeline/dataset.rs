// src/pipeline/dataset.rs

use std::collections::HashMap;

use crate::{
    error::PipelineError,
    models::{
        exam_record::{ExamResult, TrainingRow, UserHistorySummary},
        question::TopicSummary,
    },
    pipeline::{Datasets, history::aggregate_history, quiz::aggregate_topics},
};

/// Output of the build stage.
#[derive(Debug, Clone)]
pub struct TrainingTable {
    pub rows: Vec<TrainingRow>,
    /// Topic breakdown of the current quiz. Not used as a model feature.
    pub topics: Vec<TopicSummary>,
}

/// Inner join of history summaries with exam results on user id.
///
/// Keeps the history order; a user with several exam results yields one row per result.
pub fn join_exam_results(
    history: &[UserHistorySummary],
    results: &[ExamResult],
) -> Vec<TrainingRow> {
    let mut ranks: HashMap<&str, Vec<i64>> = HashMap::new();
    for result in results {
        ranks.entry(result.user_id.as_str()).or_default().push(result.rank);
    }

    history
        .iter()
        .flat_map(|summary| {
            ranks
                .get(summary.user_id.as_str())
                .into_iter()
                .flatten()
                .map(move |rank| TrainingRow {
                    user_id: summary.user_id.clone(),
                    score: summary.score,
                    accuracy: summary.accuracy,
                    rank: *rank,
                })
        })
        .collect()
}

/// Builds the training table from the three datasets.
pub fn build_training_table(datasets: &Datasets) -> Result<TrainingTable, PipelineError> {
    let topics = aggregate_topics(&datasets.current_quiz.questions);
    let history = aggregate_history(&datasets.historical)?;
    let rows = join_exam_results(&history, &datasets.exam_results);

    tracing::debug!(
        topics = topics.len(),
        users = history.len(),
        results = datasets.exam_results.len(),
        rows = rows.len(),
        "Training table built"
    );

    if rows.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    Ok(TrainingTable { rows, topics })
}
