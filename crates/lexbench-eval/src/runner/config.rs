//! Evaluation configuration
//!
//! Configuration options for scoring runs, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{EvalError, EvalResult};
use crate::scoring::{LegalBenchEvaluator, PythonEvaluator, TaskEvaluator};

/// Which scoring function implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Native metric implementations
    #[default]
    Builtin,
    /// The benchmark's own `evaluation.py` through a subprocess
    Python,
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorerKind::Builtin => write!(f, "builtin"),
            ScorerKind::Python => write!(f, "python"),
        }
    }
}

impl FromStr for ScorerKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "builtin" => Ok(ScorerKind::Builtin),
            "python" => Ok(ScorerKind::Python),
            other => Err(EvalError::Config(format!(
                "unknown scorer `{}` (expected builtin or python)",
                other
            ))),
        }
    }
}

/// Configuration for scoring runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// LegalBench checkout, used by the Python scorer
    #[serde(default = "default_legalbench_dir")]
    pub legalbench_dir: PathBuf,

    /// Directory holding one subdirectory per task
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: PathBuf,

    /// Evaluation split; selects `<split>.tsv` and filters predictions
    #[serde(default = "default_split")]
    pub split: String,

    /// Markdown report appended to on every run
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Bootstrap resamples per compared task
    #[serde(default = "default_ci_samples")]
    pub ci_samples: usize,

    /// Bootstrap seed
    #[serde(default = "default_ci_seed")]
    pub ci_seed: u64,

    #[serde(default)]
    pub scorer: ScorerKind,

    /// Interpreter for the Python scorer
    #[serde(default = "default_python")]
    pub python: String,
}

fn default_legalbench_dir() -> PathBuf {
    PathBuf::from("data/legalbench")
}

fn default_tasks_dir() -> PathBuf {
    PathBuf::from("data/legalbench/tasks")
}

fn default_split() -> String {
    "test".to_string()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("docs/legalbench-results.md")
}

fn default_ci_samples() -> usize {
    1000
}

fn default_ci_seed() -> u64 {
    1337
}

fn default_python() -> String {
    "python3".to_string()
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            legalbench_dir: default_legalbench_dir(),
            tasks_dir: default_tasks_dir(),
            split: default_split(),
            report_path: default_report_path(),
            ci_samples: default_ci_samples(),
            ci_seed: default_ci_seed(),
            scorer: ScorerKind::default(),
            python: default_python(),
        }
    }
}

impl EvalConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> EvalResult<Self> {
        toml::from_str(content).map_err(|e| EvalError::Config(e.to_string()))
    }

    /// Load a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> EvalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        toml::from_str(&content)
            .map_err(|e| EvalError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Set the LegalBench checkout
    pub fn with_legalbench_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.legalbench_dir = dir.into();
        self
    }

    /// Set the task directory
    pub fn with_tasks_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tasks_dir = dir.into();
        self
    }

    pub fn with_split(mut self, split: impl Into<String>) -> Self {
        self.split = split.into();
        self
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Set bootstrap resamples
    pub fn with_ci_samples(mut self, samples: usize) -> Self {
        self.ci_samples = samples;
        self
    }

    /// Set bootstrap seed
    pub fn with_ci_seed(mut self, seed: u64) -> Self {
        self.ci_seed = seed;
        self
    }

    pub fn with_scorer(mut self, scorer: ScorerKind) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    /// Reject values no run can use
    pub fn validate(&self) -> EvalResult<()> {
        if self.ci_samples == 0 {
            return Err(EvalError::Config("ci_samples must be at least 1".to_string()));
        }
        if self.split.trim().is_empty() {
            return Err(EvalError::Config("split must not be empty".to_string()));
        }
        Ok(())
    }

    /// Instantiate the configured scoring function
    pub fn build_evaluator(&self) -> Box<dyn TaskEvaluator> {
        match self.scorer {
            ScorerKind::Builtin => Box::new(LegalBenchEvaluator::new()),
            ScorerKind::Python => Box::new(PythonEvaluator::new(&self.python, &self.legalbench_dir)),
        }
    }
}
