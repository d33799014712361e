//! CLI commands

pub mod check;
pub mod report;
pub mod score;
pub mod tasks;

use std::path::Path;

use anyhow::Result;
use lexbench_eval::runner::EvalConfig;
use lexbench_eval::tasks::PredictionSet;

/// Configuration from the optional TOML file, or the defaults
pub(crate) fn load_config(path: Option<&Path>) -> Result<EvalConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            Ok(EvalConfig::from_file(path)?)
        }
        None => Ok(EvalConfig::default()),
    }
}

/// Read and validate a predictions file
pub(crate) async fn read_predictions(path: &Path, split: &str) -> Result<PredictionSet> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read predictions {}: {}", path.display(), e))?;
    Ok(PredictionSet::parse(&path.display().to_string(), &content, split)?)
}
