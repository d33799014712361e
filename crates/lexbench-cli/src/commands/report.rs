//! Rendering of saved runs

use std::path::PathBuf;

use anyhow::{Context, Result};
use lexbench_eval::metrics::EvaluationRun;
use lexbench_eval::report::{ReportFormat, generate_report};

/// Show a report from a run saved with `score --json-out`
pub async fn render(input: PathBuf, format: ReportFormat) -> Result<()> {
    let content = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let run: EvaluationRun = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a saved run", input.display()))?;

    let report = generate_report(&run, format)?;
    println!("{}", report);
    Ok(())
}
