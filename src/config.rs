// src/config.rs

use std::{env, net::SocketAddr, time::Duration};

use dotenvy::dotenv;
use url::Url;

use crate::pipeline::{forest::TreeParams, model::ModelConfig};

/// Topics answered with lower accuracy are reported as weak areas.
pub const WEAK_AREA_THRESHOLD: f64 = 0.6;

pub const DEFAULT_CURRENT_QUIZ_URL: &str = "https://www.jsonkeeper.com/b/LLQT";
pub const DEFAULT_HISTORICAL_QUIZ_URL: &str = "https://api.jsonserve.com/rJvd7g";
pub const DEFAULT_EXAM_RESULTS_URL: &str = "https://api.jsonserve.com/XgAgFJ";

#[derive(Debug, Clone)]
pub struct Config {
    pub current_quiz_url: Url,
    pub historical_quiz_url: Url,
    pub exam_results_url: Url,
    pub fetch_timeout: Duration,
    pub model: ModelConfig,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
}

impl Config {
    /// Reads the environment (after loading `.env`).
    ///
    /// Panics with the variable name on malformed values; only called at startup.
    pub fn from_env() -> Self {
        dotenv().ok();

        let current_quiz_url = data_url("CURRENT_QUIZ_URL", DEFAULT_CURRENT_QUIZ_URL);
        let historical_quiz_url = data_url("HISTORICAL_QUIZ_URL", DEFAULT_HISTORICAL_QUIZ_URL);
        let exam_results_url = data_url("EXAM_RESULTS_URL", DEFAULT_EXAM_RESULTS_URL);

        let fetch_timeout = Duration::from_secs(parsed("FETCH_TIMEOUT_SECS", 10));

        let model = model_config(
            parsed("N_ESTIMATORS", 100),
            parsed("RANDOM_SEED", 42),
            parsed("TEST_SIZE", 0.2),
        );

        let bind_addr = parsed("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)));

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            current_quiz_url,
            historical_quiz_url,
            exam_results_url,
            fetch_timeout,
            model,
            bind_addr,
            rust_log,
        }
    }
}

fn model_config(n_estimators: usize, random_seed: u64, test_size: f64) -> ModelConfig {
    if n_estimators == 0 {
        panic!("N_ESTIMATORS must be at least 1");
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        panic!("TEST_SIZE must lie strictly between 0 and 1, got {test_size}");
    }

    ModelConfig {
        n_estimators,
        random_seed,
        test_size,
        tree: TreeParams::default(),
    }
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} has an invalid value: '{raw}'")),
        Err(_) => default,
    }
}

fn data_url(name: &str, default: &str) -> Url {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let url = Url::parse(&raw).unwrap_or_else(|e| panic!("{name} must be a valid URL: {e}"));
    match url.scheme() {
        "http" | "https" | "file" => url,
        other => panic!("{name} uses unsupported scheme '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_keeps_valid_values() {
        let model = model_config(25, 7, 0.25);
        assert_eq!(model.n_estimators, 25);
        assert_eq!(model.random_seed, 7);
        assert_eq!(model.test_size, 0.25);
    }

    #[test]
    #[should_panic(expected = "N_ESTIMATORS must be at least 1")]
    fn test_zero_trees_is_rejected() {
        model_config(0, 42, 0.2);
    }

    #[test]
    #[should_panic(expected = "TEST_SIZE")]
    fn test_out_of_range_test_size_is_rejected() {
        model_config(100, 42, 1.0);
    }
}
