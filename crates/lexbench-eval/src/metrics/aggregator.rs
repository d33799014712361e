//! Run-level aggregation of task results

use super::types::{RunSummary, TaskResult};

/// Unweighted mean; `None` for an empty input
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Weighted mean of `(value, weight)` pairs; `None` when the total weight is zero
pub fn weighted_mean(pairs: impl IntoIterator<Item = (f64, usize)>) -> Option<f64> {
    let (num, den) = pairs
        .into_iter()
        .fold((0.0, 0usize), |(num, den), (v, w)| (num + v * w as f64, den + w));
    (den > 0).then(|| num / den as f64)
}

/// Summarizes a run's task results
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Macro and weighted score averages over scored tasks, weighted coverage over all
    pub fn summarize(results: &[TaskResult]) -> RunSummary {
        let scored = || results.iter().filter_map(|r| r.score.map(|s| (s, r.n_test)));

        RunSummary {
            task_count: results.len(),
            scored_count: scored().count(),
            macro_average: mean(scored().map(|(s, _)| s)),
            weighted_average: weighted_mean(scored()),
            overall_coverage: weighted_mean(results.iter().map(|r| (r.coverage, r.n_test))),
        }
    }
}
