// src/source.rs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::PipelineError;

/// The three upstream datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// `{"questions": [...]}` of the latest quiz attempt.
    CurrentQuiz,
    /// Array of past attempts with response maps.
    HistoricalQuiz,
    /// Array of `{userId, rank}`.
    ExamResults,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [
        Dataset::CurrentQuiz,
        Dataset::HistoricalQuiz,
        Dataset::ExamResults,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dataset::CurrentQuiz => "current quiz",
            Dataset::HistoricalQuiz => "historical quiz",
            Dataset::ExamResults => "exam results",
        }
    }
}

/// Read-only access to raw datasets.
/// Any failure to obtain a dataset is reported as `PipelineError::Fetch`.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, dataset: Dataset) -> Result<Value, PipelineError>;
}

fn fetch_error(dataset: Dataset, message: impl ToString) -> PipelineError {
    PipelineError::Fetch {
        dataset: dataset.name(),
        message: message.to_string(),
    }
}

/// Fetches datasets from `http(s)://` or `file://` URLs.
#[derive(Clone)]
pub struct UrlSource {
    client: reqwest::Client,
    current_quiz: Url,
    historical_quiz: Url,
    exam_results: Url,
}

impl UrlSource {
    pub fn new(current_quiz: Url, historical_quiz: Url, exam_results: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            current_quiz,
            historical_quiz,
            exam_results,
        }
    }

    pub fn url(&self, dataset: Dataset) -> &Url {
        match dataset {
            Dataset::CurrentQuiz => &self.current_quiz,
            Dataset::HistoricalQuiz => &self.historical_quiz,
            Dataset::ExamResults => &self.exam_results,
        }
    }

    async fn fetch_http(&self, dataset: Dataset, url: &Url) -> Result<Value, PipelineError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(dataset, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(dataset, format!("HTTP {status} from {url}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| fetch_error(dataset, format!("invalid JSON body: {e}")))
    }

    async fn fetch_file(&self, dataset: Dataset, url: &Url) -> Result<Value, PipelineError> {
        let path = url
            .to_file_path()
            .map_err(|_| fetch_error(dataset, format!("not a local path: {url}")))?;

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| fetch_error(dataset, format!("{}: {e}", path.display())))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| fetch_error(dataset, format!("invalid JSON in {}: {e}", path.display())))
    }
}

#[async_trait]
impl DataSource for UrlSource {
    async fn fetch(&self, dataset: Dataset) -> Result<Value, PipelineError> {
        let url = self.url(dataset);
        tracing::debug!(dataset = dataset.name(), %url, "Fetching dataset");

        match url.scheme() {
            "http" | "https" => self.fetch_http(dataset, url).await,
            "file" => self.fetch_file(dataset, url).await,
            other => Err(fetch_error(dataset, format!("unsupported URL scheme '{other}'"))),
        }
    }
}

/// In-memory datasets. A dataset that was never set fails to fetch.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    datasets: HashMap<Dataset, Value>,
}

impl StaticSource {
    pub fn new(current_quiz: Value, historical_quiz: Value, exam_results: Value) -> Self {
        Self::default()
            .with(Dataset::CurrentQuiz, current_quiz)
            .with(Dataset::HistoricalQuiz, historical_quiz)
            .with(Dataset::ExamResults, exam_results)
    }

    pub fn with(mut self, dataset: Dataset, value: Value) -> Self {
        self.datasets.insert(dataset, value);
        self
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch(&self, dataset: Dataset) -> Result<Value, PipelineError> {
        self.datasets
            .get(&dataset)
            .cloned()
            .ok_or_else(|| fetch_error(dataset, "dataset not available"))
    }
}
