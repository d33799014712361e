//! Gold answers for a task
//!
//! Gold data comes from `<tasks_dir>/<task>/<split>.tsv`. A task with no
//! usable gold file is not an error: it is reported as [`GoldData::Unavailable`]
//! so the rest of the run can proceed.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

/// Columns that may hold the gold answer, in order of preference
pub const ANSWER_COLUMNS: [&str; 5] = ["answer", "label", "output", "target", "gold"];

/// Column holding an explicit example id
pub const INDEX_COLUMN: &str = "index";

/// One gold example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldRow {
    pub id: u64,
    pub answer: String,
}

/// Ordered gold examples of one task, unique by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldSet {
    task: String,
    rows: Vec<GoldRow>,
}

impl GoldSet {
    /// Build a gold set, returning the first duplicated id on failure
    pub fn from_rows(task: impl Into<String>, rows: Vec<GoldRow>) -> Result<Self, u64> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.id) {
                return Err(row.id);
            }
        }
        Ok(Self {
            task: task.into(),
            rows,
        })
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn rows(&self) -> &[GoldRow] {
        &self.rows
    }

    pub fn ids(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.id).collect()
    }

    pub fn answers(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.answer.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of looking up gold data for a task
#[derive(Debug, Clone, PartialEq)]
pub enum GoldData {
    /// Gold rows are available
    Available(GoldSet),
    /// No rows could be read; `note` says why
    Unavailable { note: String },
}

impl GoldData {
    pub fn unavailable(note: impl Into<String>) -> Self {
        GoldData::Unavailable { note: note.into() }
    }
}

/// Source of gold answers, keyed by task
pub trait GoldProvider: Send + Sync {
    /// Load the gold set for `task`
    fn load(&self, task: &str) -> EvalResult<GoldData>;
}

/// Reads gold answers from the benchmark's per-task TSV files
#[derive(Debug, Clone)]
pub struct TsvGoldProvider {
    tasks_dir: PathBuf,
    split: String,
}

impl TsvGoldProvider {
    pub fn new(tasks_dir: impl AsRef<Path>, split: impl Into<String>) -> Self {
        Self {
            tasks_dir: tasks_dir.as_ref().to_path_buf(),
            split: split.into(),
        }
    }

    /// Path of the gold file for a task
    pub fn gold_path(&self, task: &str) -> PathBuf {
        self.tasks_dir.join(task).join(format!("{}.tsv", self.split))
    }
}

impl GoldProvider for TsvGoldProvider {
    fn load(&self, task: &str) -> EvalResult<GoldData> {
        let path = self.gold_path(task);
        let file_name = format!("{}.tsv", self.split);
        if !path.is_file() {
            return Ok(GoldData::unavailable(format!("missing {}", file_name)));
        }
        let file = File::open(&path).map_err(|e| EvalError::io(&path, e))?;
        read_gold(task, &path, &file_name, file)
    }
}

fn tsv_error(path: &Path, err: csv::Error) -> EvalError {
    EvalError::Tsv {
        path: path.to_path_buf(),
        line: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}

fn pick_answer_column(headers: &StringRecord, path: &Path) -> EvalResult<usize> {
    ANSWER_COLUMNS
        .iter()
        .find_map(|candidate| headers.iter().position(|h| h == *candidate))
        .ok_or_else(|| EvalError::MissingAnswerColumn {
            path: path.to_path_buf(),
            columns: headers.iter().map(str::to_string).collect(),
        })
}

/// Read tab-separated gold rows for `task`
fn read_gold<R: Read>(task: &str, path: &Path, file_name: &str, input: R) -> EvalResult<GoldData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers().map_err(|e| tsv_error(path, e))?.clone();
    if headers.is_empty() {
        return Ok(GoldData::unavailable(format!("empty {}", file_name)));
    }

    let answer_col = pick_answer_column(&headers, path)?;
    let index_col = headers.iter().position(|h| h == INDEX_COLUMN);

    let mut rows = Vec::new();
    for (position, result) in reader.records().enumerate() {
        let record = result.map_err(|e| tsv_error(path, e))?;
        let id = index_col
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|raw| !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()))
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(position as u64);
        let answer = record
            .get(answer_col)
            .map(|a| a.trim().to_string())
            .unwrap_or_default();
        rows.push(GoldRow { id, answer });
    }

    if rows.is_empty() {
        return Ok(GoldData::unavailable(format!("no rows in {}", file_name)));
    }

    let set = GoldSet::from_rows(task, rows).map_err(|id| EvalError::DuplicateGoldId {
        path: path.to_path_buf(),
        id,
    })?;
    tracing::debug!(task, rows = set.len(), path = %path.display(), "loaded gold set");
    Ok(GoldData::Available(set))
}

/// Gold sets held in memory, for programmatic callers and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryGoldProvider {
    sets: HashMap<String, GoldSet>,
}

impl InMemoryGoldProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gold set under its task name
    pub fn with_set(mut self, set: GoldSet) -> Self {
        self.sets.insert(set.task().to_string(), set);
        self
    }
}

impl GoldProvider for InMemoryGoldProvider {
    fn load(&self, task: &str) -> EvalResult<GoldData> {
        Ok(match self.sets.get(task) {
            Some(set) if !set.is_empty() => GoldData::Available(set.clone()),
            Some(_) => GoldData::unavailable("no gold rows"),
            None => GoldData::unavailable("missing gold data"),
        })
    }
}
