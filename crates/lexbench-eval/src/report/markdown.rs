//! Markdown report generation
//!
//! The report is an append-only log: the header is written once, then every
//! run adds its own section (and a comparison section when there is one).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::metrics::{ComparisonRecord, ComparisonRun, EvaluationRun};

/// Written once, when the report file is created
pub const REPORT_HEADER: &str = r#"# LegalBench Evaluation

## Predictions JSONL format

One JSON object per line:

```json
{"task":"abercrombie","split":"test","id":0,"prediction":"Yes","meta":{"model":"gpt-4.1-mini"}}
```

Required fields:
- `task`: task directory name under `data/legalbench/tasks/`
- `split`: use `"test"`
- `id`: row index (0-based) in `test.tsv`
- `prediction`: string output

Optional fields:
- `meta`: any metadata (model, temperature, prompt version)
- `input`: saved raw row fields for debugging

## Results
"#;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

/// Placeholder for an undefined summary value or interval
const MISSING: &str = "—";

/// Placeholder for an undefined score in the comparison table
const NOT_AVAILABLE: &str = "n/a";

fn format_float(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.4}", v))
}

fn format_score(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.4}", v))
}

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Section title, with the run name when there is one
    fn title(kind: &str, run: &EvaluationRun) -> String {
        let mut title = format!("### {} {}", kind, run.timestamp.format(TIMESTAMP_FORMAT));
        if let Some(name) = run.run_name.as_deref().filter(|n| !n.is_empty()) {
            title.push_str(" — ");
            title.push_str(name);
        }
        title
    }

    /// Render the per-run section
    pub fn render_run(run: &EvaluationRun) -> String {
        let mut md = String::new();
        md.push('\n');
        md.push_str(&Self::title("Run", run));
        md.push_str("\n\n");

        md.push_str(&format!("- Predictions: `{}`\n", run.predictions));
        md.push_str(&format!("- Tasks: `{}`\n", run.summary.task_count));
        md.push_str(&format!(
            "- Weighted coverage: `{}`\n",
            format_float(run.summary.overall_coverage)
        ));
        md.push_str(&format!(
            "- Macro avg (scored tasks): `{}`\n",
            format_float(run.summary.macro_average)
        ));
        md.push_str(&format!(
            "- Weighted avg (scored tasks): `{}`\n\n",
            format_float(run.summary.weighted_average)
        ));

        md.push_str("| task | n_test | n_pred | coverage | score | note |\n");
        md.push_str("|---|---:|---:|---:|---:|---|\n");
        for r in &run.results {
            md.push_str(&format!(
                "| {} | {} | {} | {:.3} | {} | {} |\n",
                r.task,
                r.n_test,
                r.n_pred,
                r.coverage,
                format_float(r.score),
                r.note.as_deref().unwrap_or("")
            ));
        }
        md
    }

    /// Render the comparison section
    pub fn render_comparison(run: &EvaluationRun, comparison: &ComparisonRun) -> String {
        let mut md = String::new();
        md.push_str("\n\n");
        md.push_str(&Self::title("Compare", run));
        md.push_str("\n\n");

        md.push_str(&format!("- Primary: `{}`\n", run.predictions));
        md.push_str(&format!("- Baseline: `{}`\n", comparison.baseline));
        md.push_str(&format!("- Tasks: `{}`\n", comparison.records.len()));
        md.push_str(&format!(
            "- Bootstrap CI: samples={}, seed={}\n\n",
            comparison.ci_samples, comparison.ci_seed
        ));

        md.push_str(
            "| task | score_primary | score_baseline | delta | wins | losses | ties | diff_ci95 | mcnemar_p |\n",
        );
        md.push_str("|---|---:|---:|---:|---:|---:|---:|---:|---:|\n");
        for record in &comparison.records {
            md.push_str(&Self::comparison_row(record));
        }
        md
    }

    fn comparison_row(record: &ComparisonRecord) -> String {
        let ci = match record.ci {
            Some(ci) => format!("[{:.4},{:.4}]", ci.low, ci.high),
            None => MISSING.to_string(),
        };
        format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            record.task,
            format_score(record.score_primary),
            format_score(record.score_baseline),
            format_score(record.delta),
            record.wins,
            record.losses,
            record.ties,
            ci,
            format_float(record.p_value)
        )
    }

    /// Render everything a run appends
    pub fn generate(run: &EvaluationRun) -> String {
        let mut md = Self::render_run(run);
        if let Some(comparison) = &run.comparison {
            md.push_str(&Self::render_comparison(run, comparison));
        }
        md
    }

    /// Append a run to the report at `path`, creating it with the header first
    pub fn append(path: impl AsRef<Path>, run: &EvaluationRun) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let exists = path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open report {}", path.display()))?;
        if !exists {
            file.write_all(REPORT_HEADER.as_bytes())?;
        }
        file.write_all(Self::generate(run).as_bytes())
            .with_context(|| format!("Failed to write report {}", path.display()))?;

        tracing::debug!(path = %path.display(), "appended report section");
        Ok(())
    }
}
