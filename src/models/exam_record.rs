// src/models/exam_record.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::question::AnswerKey;

/// Suffix marking the correct-answer sibling of a response entry in the upstream format.
pub const CORRECT_SUFFIX: &str = "_correct";

/// Submitted and correct answers of one historical attempt, keyed by question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMap {
    pub answers: BTreeMap<String, AnswerKey>,
    pub correct_answers: BTreeMap<String, AnswerKey>,
}

impl ResponseMap {
    /// Splits the flat upstream map (`k` next to `k_correct`) into its two halves.
    ///
    /// A `k_correct` entry whose `k` is absent is rejected.
    pub fn from_flat(flat: BTreeMap<String, AnswerKey>) -> Result<Self, String> {
        let mut map = ResponseMap::default();

        for (key, value) in flat {
            match key.strip_suffix(CORRECT_SUFFIX) {
                Some(question) if !question.is_empty() => {
                    map.correct_answers.insert(question.to_string(), value);
                }
                _ => {
                    map.answers.insert(key, value);
                }
            }
        }

        if let Some(orphan) = map
            .correct_answers
            .keys()
            .find(|question| !map.answers.contains_key(*question))
        {
            return Err(format!(
                "responseMap has '{orphan}{CORRECT_SUFFIX}' without a '{orphan}' entry"
            ));
        }

        Ok(map)
    }

    /// Number of answered questions (correct-answer entries excluded).
    pub fn total_questions(&self) -> usize {
        self.answers.len()
    }

    pub fn correct_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|(question, answer)| self.correct_answers.get(*question) == Some(*answer))
            .count()
    }
}

/// Wire shape of a historical attempt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHistoricalAttempt {
    pub user_id: String,
    pub score: f64,
    pub response_map: BTreeMap<String, AnswerKey>,
}

/// One past quiz attempt of a user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawHistoricalAttempt")]
pub struct HistoricalAttempt {
    pub user_id: String,
    pub score: f64,
    pub responses: ResponseMap,
}

impl TryFrom<RawHistoricalAttempt> for HistoricalAttempt {
    type Error = String;

    fn try_from(raw: RawHistoricalAttempt) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: raw.user_id,
            score: raw.score,
            responses: ResponseMap::from_flat(raw.response_map)?,
        })
    }
}

/// Mean score and accuracy over all attempts of one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserHistorySummary {
    pub user_id: String,
    pub score: f64,
    pub accuracy: f64,
}

/// Past competitive-exam standing of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub user_id: String,
    pub rank: i64,
}

/// A history summary joined with the user's exam rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingRow {
    pub user_id: String,
    pub score: f64,
    pub accuracy: f64,
    pub rank: i64,
}

impl TrainingRow {
    pub fn features(&self) -> [f64; 2] {
        [self.score, self.accuracy]
    }
}
