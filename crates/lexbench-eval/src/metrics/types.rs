//! Core result types for evaluation
//!
//! Defines the records handed to report sinks. Undefined statistics are
//! `None`, never zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score and coverage of one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task identifier
    pub task: String,

    /// Number of gold examples
    pub n_test: usize,

    /// Gold examples that had a prediction
    pub n_pred: usize,

    /// `n_pred / n_test`, zero when there are no gold examples
    pub coverage: f64,

    /// Task score, absent when scoring failed or was not numeric
    pub score: Option<f64>,

    /// Diagnostic note
    pub note: Option<String>,
}

impl TaskResult {
    /// Create a task result; coverage is derived from the counts
    pub fn new(
        task: impl Into<String>,
        n_test: usize,
        n_pred: usize,
        score: Option<f64>,
        note: Option<String>,
    ) -> Self {
        let coverage = if n_test > 0 {
            n_pred as f64 / n_test as f64
        } else {
            0.0
        };

        Self {
            task: task.into(),
            n_test,
            n_pred,
            coverage,
            score,
            note,
        }
    }

    /// A zero-count result for a task without gold data
    pub fn unavailable(task: impl Into<String>, note: impl Into<String>) -> Self {
        Self::new(task, 0, 0, None, Some(note.into()))
    }
}

/// Two-sided percentile interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

/// Paired comparison of a primary and a baseline run on one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub task: String,

    /// Number of gold examples compared
    pub n_test: usize,

    pub score_primary: Option<f64>,
    pub score_baseline: Option<f64>,

    /// `score_primary - score_baseline`, absent if either side is
    pub delta: Option<f64>,

    /// Primary correct, baseline wrong
    pub wins: usize,

    /// Baseline correct, primary wrong
    pub losses: usize,

    /// Both correct or both wrong
    pub ties: usize,

    /// 95% bootstrap interval on the accuracy difference
    pub ci: Option<ConfidenceInterval>,

    /// Exact two-sided test on the discordant pairs
    pub p_value: Option<f64>,

    pub note: Option<String>,
}

/// Aggregate scalars over a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of tasks evaluated
    pub task_count: usize,

    /// Number of tasks with a score
    pub scored_count: usize,

    /// Unweighted mean score over scored tasks
    pub macro_average: Option<f64>,

    /// Mean score over scored tasks, weighted by `n_test`
    pub weighted_average: Option<f64>,

    /// Mean coverage over all tasks, weighted by `n_test`
    pub overall_coverage: Option<f64>,
}

/// Comparison section of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRun {
    /// Label of the baseline predictions (usually a path)
    pub baseline: String,

    /// Bootstrap resamples per task
    pub ci_samples: usize,

    /// Bootstrap seed
    pub ci_seed: u64,

    pub records: Vec<ComparisonRecord>,
}

/// Everything one invocation produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRun {
    /// Optional run name shown in reports
    pub run_name: Option<String>,

    /// Label of the primary predictions (usually a path)
    pub predictions: String,

    /// Name of the scoring function
    pub evaluator: String,

    /// Evaluation split
    pub split: String,

    pub timestamp: DateTime<Utc>,

    pub results: Vec<TaskResult>,

    pub summary: RunSummary,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonRun>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_derivation() {
        let r = TaskResult::new("t", 10, 6, Some(0.5), None);
        assert_eq!(r.coverage, 0.6);
        assert_eq!(r.score, Some(0.5));

        let empty = TaskResult::unavailable("t", "missing test.tsv");
        assert_eq!(empty.coverage, 0.0);
        assert_eq!(empty.n_test, 0);
        assert_eq!(empty.note.as_deref(), Some("missing test.tsv"));
        assert_eq!(empty.score, None);
    }
}
