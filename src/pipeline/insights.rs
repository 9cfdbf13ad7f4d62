// src/pipeline/insights.rs

use crate::{
    config::WEAK_AREA_THRESHOLD,
    error::PipelineError,
    models::{
        exam_record::UserHistorySummary,
        prediction::{Insights, Trend},
        question::TopicSummary,
    },
    pipeline::{Datasets, history::aggregate_history, quiz::aggregate_topics},
    utils::stats::{mean, mean_successive_difference},
};

/// Topics whose accuracy is below the weak-area threshold, in topic order.
pub fn weak_areas(topics: &[TopicSummary]) -> Vec<String> {
    topics
        .iter()
        .filter(|summary| summary.accuracy < WEAK_AREA_THRESHOLD)
        .map(|summary| summary.topic.clone())
        .collect()
}

/// Sign of the mean step between successive accuracies.
///
/// A flat or too-short sequence counts as improving.
pub fn trend(accuracies: &[f64]) -> Trend {
    match mean_successive_difference(accuracies) {
        Some(diff) if diff < 0.0 => Trend::Declining,
        _ => Trend::Improving,
    }
}

/// Derives insights from the raw datasets, re-aggregating them independently of the build stage.
///
/// `overall_accuracy` and the trend are computed across all users in the history,
/// ordered by user id, not only for the requested user.
pub fn generate_insights(datasets: &Datasets) -> Result<Insights, PipelineError> {
    let topics = aggregate_topics(&datasets.current_quiz.questions);
    let history = aggregate_history(&datasets.historical)?;
    insights_from_summaries(&topics, &history)
}

pub fn insights_from_summaries(
    topics: &[TopicSummary],
    history: &[UserHistorySummary],
) -> Result<Insights, PipelineError> {
    let accuracies: Vec<f64> = history.iter().map(|row| row.accuracy).collect();
    let overall_accuracy = mean(&accuracies).ok_or(PipelineError::EmptyDataset)?;

    Ok(Insights {
        weak_areas: weak_areas(topics),
        improvement_trend: trend(&accuracies),
        overall_accuracy,
    })
}
