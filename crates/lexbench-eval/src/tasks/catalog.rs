//! Task discovery and selection

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::PredictionSet;
use crate::error::{EvalError, EvalResult};

/// The set of tasks in a benchmark checkout: one directory per task
pub struct TaskCatalog {
    tasks_dir: PathBuf,
}

impl TaskCatalog {
    pub fn new(tasks_dir: impl AsRef<Path>) -> Self {
        Self {
            tasks_dir: tasks_dir.as_ref().to_path_buf(),
        }
    }

    pub fn tasks_dir(&self) -> &Path {
        &self.tasks_dir
    }

    /// Task directory names, sorted
    pub fn discover(&self) -> EvalResult<Vec<String>> {
        if !self.tasks_dir.is_dir() {
            return Err(EvalError::io(
                &self.tasks_dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "tasks directory not found"),
            ));
        }

        let mut tasks = Vec::new();
        for entry in WalkDir::new(&self.tasks_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.tasks_dir.clone());
                EvalError::io(path, e.into())
            })?;
            if entry.file_type().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    if !name.starts_with('.') {
                        tasks.push(name.to_string());
                    }
                }
            }
        }

        tasks.sort();
        Ok(tasks)
    }
}

/// Which tasks a run should score
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSelection {
    /// Every task in the catalog, predicted or not
    All,
    /// An explicit list
    Listed(Vec<String>),
    /// The tasks that appear in the primary predictions
    FromPredictions,
}

impl TaskSelection {
    /// Parse a comma-separated list, dropping blank entries
    pub fn from_list(list: &str) -> Self {
        TaskSelection::Listed(
            list.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Resolve to concrete task names
    pub fn resolve(&self, catalog: &TaskCatalog, predictions: &PredictionSet) -> EvalResult<Vec<String>> {
        match self {
            TaskSelection::All => catalog.discover(),
            TaskSelection::Listed(tasks) => Ok(tasks.clone()),
            TaskSelection::FromPredictions => Ok(predictions.tasks()),
        }
    }
}
