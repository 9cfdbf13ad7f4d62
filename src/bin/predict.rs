// src/bin/predict.rs

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use rank_predictor::{Pipeline, config::Config, source::UrlSource};
use tracing_subscriber::EnvFilter;

/// Predicts one user's exam rank against the configured data sources and prints JSON.
#[derive(Parser, Debug)]
#[command(name = "predict", version)]
struct Cli {
    /// User to predict for
    user_id: String,

    /// Override RANDOM_SEED
    #[arg(long)]
    seed: Option<u64>,

    /// Override N_ESTIMATORS
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    trees: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut model = config.model.clone();
    if let Some(seed) = cli.seed {
        model.random_seed = seed;
    }
    if let Some(trees) = cli.trees {
        model.n_estimators = trees as usize;
    }

    let source = UrlSource::new(
        config.current_quiz_url,
        config.historical_quiz_url,
        config.exam_results_url,
    );
    let pipeline = Pipeline::new(Arc::new(source), model, config.fetch_timeout);

    match pipeline.predict_for_user(&cli.user_id).await {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("error ({}): {e}", e.kind());
            ExitCode::FAILURE
        }
    }
}
