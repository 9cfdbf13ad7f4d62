// src/pipeline/model.rs

use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

use crate::{
    error::PipelineError,
    models::exam_record::TrainingRow,
    pipeline::forest::{Features, RandomForest, TreeParams},
    utils::stats::mean_absolute_error,
};

/// Rank model hyperparameters.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub n_estimators: usize,
    /// Seeds both the train/holdout shuffle and the bootstrap draws.
    pub random_seed: u64,
    /// Share of rows withheld from training, in (0, 1).
    pub test_size: f64,
    pub tree: TreeParams,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            random_seed: 42,
            test_size: 0.2,
            tree: TreeParams::default(),
        }
    }
}

/// Index partition of a seeded shuffle.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<usize>,
    pub holdout: Vec<usize>,
}

/// Shuffles `0..n` and withholds `ceil(n * test_size)` indices.
///
/// Both partitions must end up non-empty.
pub fn train_holdout_split(n: usize, test_size: f64, seed: u64) -> Result<Split, PipelineError> {
    let holdout_len = (n as f64 * test_size).ceil() as usize;
    if n < 2 || holdout_len == 0 || holdout_len >= n {
        return Err(PipelineError::InsufficientData { rows: n });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(holdout_len);
    Ok(Split {
        train,
        holdout: indices,
    })
}

/// A forest fit for one pipeline run.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    forest: RandomForest,
    /// Mean absolute rank error on the holdout rows.
    pub holdout_mae: f64,
    pub train_rows: usize,
    pub holdout_rows: usize,
}

impl TrainedModel {
    /// Estimated rank for `[score, accuracy]`.
    pub fn predict(&self, features: &Features) -> f64 {
        self.forest.predict(features)
    }
}

/// Fits the rank model on `(score, accuracy) -> rank`.
pub fn train(rows: &[TrainingRow], config: &ModelConfig) -> Result<TrainedModel, PipelineError> {
    let split = train_holdout_split(rows.len(), config.test_size, config.random_seed)?;

    let x: Vec<Features> = split.train.iter().map(|&i| rows[i].features()).collect();
    let y: Vec<f64> = split.train.iter().map(|&i| rows[i].rank as f64).collect();

    let forest = RandomForest::fit(&x, &y, config.n_estimators, config.random_seed, &config.tree)
        .ok_or(PipelineError::InsufficientData { rows: rows.len() })?;

    let predicted: Vec<f64> = split
        .holdout
        .iter()
        .map(|&i| forest.predict(&rows[i].features()))
        .collect();
    let actual: Vec<f64> = split.holdout.iter().map(|&i| rows[i].rank as f64).collect();
    let holdout_mae = mean_absolute_error(&predicted, &actual).unwrap_or(0.0);

    tracing::debug!(
        trees = forest.n_trees(),
        train_rows = split.train.len(),
        holdout_rows = split.holdout.len(),
        holdout_mae,
        "Rank model trained"
    );

    Ok(TrainedModel {
        forest,
        holdout_mae,
        train_rows: split.train.len(),
        holdout_rows: split.holdout.len(),
    })
}
