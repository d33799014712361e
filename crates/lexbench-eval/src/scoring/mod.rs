//! Task-level scoring
//!
//! The benchmark metric itself is an injected capability: anything that
//! implements [`TaskEvaluator`] can score a task. The engine only owns the
//! call contract, the coverage bookkeeping and the degradation behavior.

mod legalbench;
mod python;
mod task_scorer;

pub use legalbench::LegalBenchEvaluator;
pub use python::PythonEvaluator;
pub use task_scorer::score_task;

use serde::{Deserialize, Serialize};

use crate::error::ScorerError;

/// Message fragment of the benign warning raised by balanced-accuracy metrics
/// when a prediction uses a label the gold set never contains
pub const UNSEEN_LABEL_WARNING: &str = "y_pred contains classes not in y_true";

/// Value returned by a scoring function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScoreValue {
    /// A numeric score
    Number(f64),
    /// Anything else, kept only for diagnostics
    NonNumeric(String),
}

impl ScoreValue {
    /// The score if it is a finite number
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            ScoreValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

/// Warning raised while scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerWarning {
    /// Predictions contain labels that never occur in the gold answers
    UnseenPredictedLabels { labels: Vec<String> },
    /// Any other warning, passed through verbatim
    Other(String),
}

impl ScorerWarning {
    /// Classify a raw warning message
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(UNSEEN_LABEL_WARNING) {
            ScorerWarning::UnseenPredictedLabels { labels: Vec::new() }
        } else {
            ScorerWarning::Other(message)
        }
    }

    /// Benign warnings are swallowed while a task is scored
    pub fn is_benign(&self) -> bool {
        matches!(self, ScorerWarning::UnseenPredictedLabels { .. })
    }
}

/// Successful outcome of a scoring call
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: ScoreValue,
    pub warnings: Vec<ScorerWarning>,
}

impl Evaluation {
    /// A numeric score with no warnings
    pub fn number(score: f64) -> Self {
        Self {
            value: ScoreValue::Number(score),
            warnings: Vec::new(),
        }
    }

    /// Attach a warning
    pub fn with_warning(mut self, warning: ScorerWarning) -> Self {
        self.warnings.push(warning);
        self
    }
}

/// Per-task scoring function: `(task, generations, answers) -> score`
///
/// Implementations may fail for any task; the engine never assumes what the
/// metric is.
pub trait TaskEvaluator: Send + Sync {
    /// Short name for logs and reports
    fn name(&self) -> &str;

    /// Score `generations` against `answers` (equal length, gold order)
    fn evaluate(
        &self,
        task: &str,
        generations: &[String],
        answers: &[String],
    ) -> Result<Evaluation, ScorerError>;
}

impl<F> TaskEvaluator for F
where
    F: Fn(&str, &[String], &[String]) -> Result<Evaluation, ScorerError> + Send + Sync,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn evaluate(
        &self,
        task: &str,
        generations: &[String],
        answers: &[String],
    ) -> Result<Evaluation, ScorerError> {
        self(task, generations, answers)
    }
}

/// Call the evaluator, dropping benign warnings and logging the rest.
pub(crate) fn evaluate_quietly(
    evaluator: &dyn TaskEvaluator,
    task: &str,
    generations: &[String],
    answers: &[String],
) -> Result<ScoreValue, ScorerError> {
    let evaluation = evaluator.evaluate(task, generations, answers)?;
    for warning in &evaluation.warnings {
        if warning.is_benign() {
            tracing::trace!(task, ?warning, "suppressed scorer warning");
        } else {
            tracing::warn!(task, evaluator = evaluator.name(), ?warning, "scorer warning");
        }
    }
    Ok(evaluation.value)
}
