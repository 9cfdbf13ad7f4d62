// src/pipeline/quiz.rs

use std::collections::BTreeMap;

use crate::models::question::{QuestionAttempt, TopicSummary};

#[derive(Default)]
struct TopicTotals {
    difficulty: f64,
    correct: usize,
    count: usize,
}

/// Groups a quiz attempt by topic.
///
/// Yields one summary per distinct topic, ordered by topic name, with the mean
/// difficulty, the share of correct answers and the number of questions.
pub fn aggregate_topics(attempts: &[QuestionAttempt]) -> Vec<TopicSummary> {
    let mut groups: BTreeMap<&str, TopicTotals> = BTreeMap::new();

    for attempt in attempts {
        let totals = groups.entry(attempt.topic.as_str()).or_default();
        totals.difficulty += attempt.difficulty;
        totals.count += 1;
        if attempt.is_correct() {
            totals.correct += 1;
        }
    }

    groups
        .into_iter()
        .map(|(topic, totals)| TopicSummary {
            topic: topic.to_string(),
            avg_difficulty: totals.difficulty / totals.count as f64,
            accuracy: totals.correct as f64 / totals.count as f64,
            question_count: totals.count,
        })
        .collect()
}
