//! Result records and run-level aggregation
//!
//! This module provides the types handed to report sinks and the
//! aggregation over per-task results.

mod aggregator;
mod types;

pub use aggregator::{MetricsAggregator, mean, weighted_mean};
pub use types::{
    ComparisonRecord, ComparisonRun, ConfidenceInterval, EvaluationRun, RunSummary, TaskResult,
};
