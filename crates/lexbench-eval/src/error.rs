//! Error types for the evaluation engine
//!
//! `EvalError` covers malformed input and I/O, and is always fatal to a run.
//! `ScorerError` covers failures of a per-task scoring function; those are
//! absorbed per task and recorded as a note instead of aborting the run.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for engine operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Fatal errors raised while reading or validating evaluation inputs
#[derive(Error, Debug)]
pub enum EvalError {
    /// A JSONL line could not be parsed
    #[error("Invalid JSONL at {source_label}:{line}: {message}")]
    InvalidJson {
        source_label: String,
        line: usize,
        message: String,
    },

    /// A JSONL line parsed, but is not a JSON object
    #[error("Invalid JSONL at {source_label}:{line}: expected object")]
    NotAnObject { source_label: String, line: usize },

    /// A required field is absent, null or empty
    #[error("{source_label}:{line}: each row must include field `{field}`")]
    MissingField {
        source_label: String,
        line: usize,
        field: &'static str,
    },

    /// The `id` field is not a non-negative integer
    #[error("{source_label}:{line}: invalid id {value} (expected a non-negative integer)")]
    InvalidId {
        source_label: String,
        line: usize,
        value: String,
    },

    /// Gold file has no recognizable answer column
    #[error("{path}: couldn't find answer column; got columns: {columns:?}")]
    MissingAnswerColumn { path: PathBuf, columns: Vec<String> },

    /// Two gold rows of the same task resolved to the same example id
    #[error("{path}: duplicate example id {id}")]
    DuplicateGoldId { path: PathBuf, id: u64 },

    /// Gold file could not be read as tab-separated records
    #[error("{path}:{line}: malformed TSV: {message}")]
    Tsv {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Underlying I/O failure with the path that caused it
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EvalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a per-task scoring function
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScorerError {
    /// No examples to score
    #[error("no examples to score")]
    EmptyInput,

    /// Generations and answers differ in length
    #[error("length mismatch: {generations} generations vs {answers} answers")]
    LengthMismatch { generations: usize, answers: usize },

    /// A gold answer could not be interpreted by the task's metric
    #[error("invalid gold answer {answer:?}")]
    InvalidAnswer { answer: String },

    /// The metric's denominator was zero
    #[error("division by zero while computing {metric}")]
    ZeroDivision { metric: &'static str },

    /// The task is not automatically scorable
    #[error("task {task} requires manual evaluation")]
    ManualEvaluation { task: String },

    /// The external scorer raised; `kind` is its exception type name
    #[error("{kind}: {message}")]
    Raised { kind: String, message: String },

    /// The external scorer could not be run or returned garbage
    #[error("scorer process failed: {0}")]
    Process(String),
}

impl ScorerError {
    /// Short, stable name of the failure, used in `eval_error: <kind>` notes
    pub fn kind(&self) -> &str {
        match self {
            Self::EmptyInput => "EmptyInput",
            Self::LengthMismatch { .. } => "LengthMismatch",
            Self::InvalidAnswer { .. } => "InvalidAnswer",
            Self::ZeroDivision { .. } => "ZeroDivision",
            Self::ManualEvaluation { .. } => "ManualEvaluation",
            Self::Raised { kind, .. } => kind,
            Self::Process(_) => "ProcessError",
        }
    }
}
