//! Evaluation runner components
//!
//! Configuration and orchestration of scoring runs.

mod config;
mod executor;

pub use config::{EvalConfig, ScorerKind};
pub use executor::{EvalProgress, EvalRunner, LabeledPredictions, ProgressCallback};
