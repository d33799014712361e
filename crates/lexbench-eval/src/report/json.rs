//! JSON report generation

use anyhow::Result;

use crate::metrics::EvaluationRun;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Generate a JSON report
    pub fn generate(run: &EvaluationRun) -> Result<String> {
        let json = serde_json::to_string_pretty(run)?;
        Ok(json)
    }
}
