// src/models/question.rs

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a question, an option or a submitted answer.
/// Upstream datasets use both JSON integers and strings for these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Id(i64),
    Text(String),
}

/// One answered question from the current quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAttempt {
    pub id: AnswerKey,

    /// Subject-area tag used for grouping.
    pub topic: String,

    pub difficulty: f64,

    /// `null` means the question was left unanswered. The field itself is required.
    #[serde(deserialize_with = "required_nullable")]
    pub selected_option_id: Option<AnswerKey>,

    pub correct_option_id: AnswerKey,
}

impl QuestionAttempt {
    pub fn is_correct(&self) -> bool {
        self.selected_option_id.as_ref() == Some(&self.correct_option_id)
    }
}

/// The current-quiz dataset: `{"questions": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentQuiz {
    pub questions: Vec<QuestionAttempt>,
}

/// Per-topic performance inside one quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSummary {
    pub topic: String,
    pub avg_difficulty: f64,
    /// Fraction of correct answers, in `[0, 1]`.
    pub accuracy: f64,
    pub question_count: usize,
}

// With `deserialize_with`, serde no longer treats a missing Option field as None.
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<AnswerKey>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<AnswerKey>::deserialize(deserializer)
}
