//! LegalBench evaluation and paired comparison engine
//!
//! Scores model predictions for LegalBench tasks against gold answers and
//! compares two prediction sets for statistically meaningful differences.
//!
//! # Features
//!
//! - **Correctness Matching**: per-example correctness with task-specific rules
//!   for open-set citations, multi-answer extraction and numeric tolerance
//! - **Task Scoring**: coverage bookkeeping around an injected scoring function
//!   that never aborts a run
//! - **Paired Comparison**: win/loss/tie counts, seeded bootstrap interval on the
//!   accuracy difference and an exact discordant-pairs test
//! - **Report Generation**: append-only Markdown and JSON output
//!
//! # Example
//!
//! ```rust,ignore
//! use lexbench_eval::{EvalConfig, EvalRunner, LabeledPredictions, PredictionSet};
//!
//! let config = EvalConfig::default();
//! let predictions = PredictionSet::load("preds.jsonl", &config.split)?;
//! let runner = EvalRunner::new(config)?;
//! let tasks = predictions.tasks();
//! let run = runner.run(None, LabeledPredictions::new("preds.jsonl", &predictions), None, &tasks)?;
//! ```

pub mod compare;
pub mod error;
pub mod matching;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod scoring;
pub mod tasks;

// Re-exports for convenience
pub use compare::PairedComparator;
pub use error::{EvalError, EvalResult, ScorerError};
pub use matching::{TaskKind, is_correct};
pub use metrics::{ComparisonRecord, EvaluationRun, MetricsAggregator, RunSummary, TaskResult};
pub use runner::{EvalConfig, EvalRunner, LabeledPredictions, ScorerKind};
pub use scoring::{LegalBenchEvaluator, PythonEvaluator, TaskEvaluator, score_task};
pub use tasks::{GoldProvider, PredictionSet, TaskCatalog, TaskSelection, TsvGoldProvider};
