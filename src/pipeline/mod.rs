// src/pipeline/mod.rs

//! Rank prediction pipeline.
//!
//! One run per request: fetch the three datasets, build the training table,
//! train the rank model, look up the requested user, predict, and attach
//! insights. Nothing is shared between runs.

pub mod dataset;
pub mod forest;
pub mod history;
pub mod insights;
pub mod model;
pub mod quiz;

use std::{sync::Arc, time::Duration};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::PipelineError,
    models::{
        exam_record::{ExamResult, HistoricalAttempt},
        prediction::PredictionResult,
        question::CurrentQuiz,
    },
    source::{DataSource, Dataset},
};

use self::{
    dataset::build_training_table,
    insights::generate_insights,
    model::{ModelConfig, train},
};

/// Typed contents of the three upstream datasets.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub current_quiz: CurrentQuiz,
    pub historical: Vec<HistoricalAttempt>,
    pub exam_results: Vec<ExamResult>,
}

impl Datasets {
    /// Decodes raw JSON into typed records.
    /// Malformed records are reported with their dataset and position.
    pub fn from_json(
        current_quiz: Value,
        historical: Value,
        exam_results: Value,
    ) -> Result<Self, PipelineError> {
        let questions = match current_quiz {
            Value::Object(mut object) => object.remove("questions").ok_or_else(|| {
                format_error(Dataset::CurrentQuiz, "missing field `questions`".to_string())
            })?,
            other => {
                return Err(format_error(
                    Dataset::CurrentQuiz,
                    format!("expected an object, found {}", json_type(&other)),
                ));
            }
        };

        Ok(Self {
            current_quiz: CurrentQuiz {
                questions: decode_records(Dataset::CurrentQuiz, questions)?,
            },
            historical: decode_records(Dataset::HistoricalQuiz, historical)?,
            exam_results: decode_records(Dataset::ExamResults, exam_results)?,
        })
    }
}

fn format_error(dataset: Dataset, message: String) -> PipelineError {
    PipelineError::DataFormat {
        dataset: dataset.name(),
        message,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_records<T: DeserializeOwned>(
    dataset: Dataset,
    value: Value,
) -> Result<Vec<T>, PipelineError> {
    let Value::Array(items) = value else {
        return Err(format_error(
            dataset,
            format!("expected an array, found {}", json_type(&value)),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| format_error(dataset, format!("record {index}: {e}")))
        })
        .collect()
}

/// Runs BUILD, TRAIN, LOOKUP, PREDICT and INSIGHTS on already fetched data.
pub fn run(
    datasets: &Datasets,
    user_id: &str,
    config: &ModelConfig,
) -> Result<PredictionResult, PipelineError> {
    let table = build_training_table(datasets)?;
    let model = train(&table.rows, config)?;

    let row = table
        .rows
        .iter()
        .find(|row| row.user_id == user_id)
        .ok_or_else(|| PipelineError::UnknownUser(user_id.to_string()))?;

    let estimate = model.predict(&row.features());
    tracing::debug!(user_id, score = row.score, accuracy = row.accuracy, estimate, "Rank predicted");

    let insights = generate_insights(datasets)?;

    Ok(PredictionResult {
        // Truncates toward zero, like an integer cast.
        predicted_rank: estimate.trunc() as i64,
        insights,
    })
}

/// Request-scoped orchestrator over a data source.
pub struct Pipeline {
    source: Arc<dyn DataSource>,
    model: ModelConfig,
    fetch_timeout: Duration,
}

impl Pipeline {
    pub fn new(source: Arc<dyn DataSource>, model: ModelConfig, fetch_timeout: Duration) -> Self {
        Self {
            source,
            model,
            fetch_timeout,
        }
    }

    async fn fetch(&self, dataset: Dataset) -> Result<Value, PipelineError> {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch(dataset)).await {
            Ok(result) => result,
            Err(_) => Err(PipelineError::Fetch {
                dataset: dataset.name(),
                message: format!("timed out after {:?}", self.fetch_timeout),
            }),
        }
    }

    /// Fetches and decodes all three datasets.
    pub async fn fetch_datasets(&self) -> Result<Datasets, PipelineError> {
        let (current_quiz, historical, exam_results) = tokio::try_join!(
            self.fetch(Dataset::CurrentQuiz),
            self.fetch(Dataset::HistoricalQuiz),
            self.fetch(Dataset::ExamResults),
        )?;

        Datasets::from_json(current_quiz, historical, exam_results)
    }

    /// Full prediction for one user, refetching and retraining from scratch.
    /// Training runs on the blocking pool so it never stalls the async workers.
    pub async fn predict_for_user(&self, user_id: &str) -> Result<PredictionResult, PipelineError> {
        let datasets = self.fetch_datasets().await?;
        tracing::info!(
            user_id,
            questions = datasets.current_quiz.questions.len(),
            attempts = datasets.historical.len(),
            results = datasets.exam_results.len(),
            "Datasets fetched"
        );

        let user_id = user_id.to_string();
        let config = self.model.clone();
        tokio::task::spawn_blocking(move || run(&datasets, &user_id, &config))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Never answers within any reasonable timeout.
    struct StalledSource;

    #[async_trait]
    impl DataSource for StalledSource {
        async fn fetch(&self, _dataset: Dataset) -> Result<Value, PipelineError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(json!([]))
        }
    }

    #[tokio::test]
    async fn test_slow_source_times_out_as_fetch_error() {
        let pipeline = Pipeline::new(
            Arc::new(StalledSource),
            ModelConfig::default(),
            Duration::from_millis(50),
        );

        match pipeline.predict_for_user("user1").await {
            Err(PipelineError::Fetch { message, .. }) => {
                assert!(message.contains("timed out"), "{message}")
            }
            other => panic!("expected Fetch timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_reports_dataset_and_record() {
        let err = Datasets::from_json(
            json!({"questions": [
                {"id": 1, "topic": "Physics", "difficulty": 1, "selectedOptionId": 1, "correctOptionId": 1},
                {"id": 2, "difficulty": 1, "selectedOptionId": 1, "correctOptionId": 1}
            ]}),
            json!([]),
            json!([]),
        )
        .unwrap_err();

        match err {
            PipelineError::DataFormat { dataset, message } => {
                assert_eq!(dataset, "current quiz");
                assert!(message.starts_with("record 1:"), "{message}");
                assert!(message.contains("topic"), "{message}");
            }
            other => panic!("expected DataFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_non_array_history_is_malformed() {
        let err = Datasets::from_json(json!({"questions": []}), json!({"userId": "a"}), json!([]))
            .unwrap_err();
        assert_eq!(err.kind(), "data_format");
    }

    #[test]
    fn test_missing_questions_key_is_malformed() {
        let err = Datasets::from_json(json!({}), json!([]), json!([])).unwrap_err();
        assert!(err.to_string().contains("questions"));
    }

    #[test]
    fn test_rank_without_integer_is_malformed() {
        let err = Datasets::from_json(
            json!({"questions": []}),
            json!([]),
            json!([{"userId": "a", "rank": null}]),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::DataFormat { dataset: "exam results", .. }));
    }
}
