//! Report generation for evaluation runs
//!
//! Markdown is the durable, append-only record; JSON is for tooling.

mod json;
mod markdown;

pub use json::JsonReporter;
pub use markdown::{MarkdownReporter, REPORT_HEADER};

use crate::metrics::EvaluationRun;
use anyhow::Result;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
}

/// Generate a report in the specified format
pub fn generate_report(run: &EvaluationRun, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => JsonReporter::generate(run),
        ReportFormat::Markdown => Ok(MarkdownReporter::generate(run)),
    }
}
