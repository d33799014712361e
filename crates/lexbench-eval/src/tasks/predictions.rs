//! Prediction files (JSONL)
//!
//! One JSON object per line:
//!
//! ```json
//! {"task":"abercrombie","split":"test","id":0,"prediction":"Yes","meta":{"model":"gpt-4.1-mini"}}
//! ```
//!
//! Any malformed row aborts loading with the file and line in the error.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EvalError, EvalResult};

/// Predictions for one task, keyed by example id
pub type TaskPredictions = HashMap<u64, String>;

/// A validated prediction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub task: String,
    pub id: u64,
    pub prediction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl PredictionRecord {
    fn from_object(object: &Map<String, Value>, source_label: &str, line: usize) -> EvalResult<Self> {
        let missing = |field: &'static str| EvalError::MissingField {
            source_label: source_label.to_string(),
            line,
            field,
        };

        let task = match object.get("task") {
            Some(Value::String(task)) if !task.is_empty() => task.clone(),
            _ => return Err(missing("task")),
        };
        let prediction = match object.get("prediction") {
            None | Some(Value::Null) => return Err(missing("prediction")),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        };
        let id = normalize_id(object.get("id")).ok_or_else(|| EvalError::InvalidId {
            source_label: source_label.to_string(),
            line,
            value: object
                .get("id")
                .map(Value::to_string)
                .unwrap_or_else(|| "null".to_string()),
        })?;

        Ok(Self {
            task,
            id,
            prediction,
            split: object.get("split").and_then(Value::as_str).map(str::to_string),
            meta: object.get("meta").cloned(),
        })
    }
}

/// Accept a non-negative integer or a string of ASCII digits
fn normalize_id(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// All predictions of a run, keyed by task and example id
#[derive(Debug, Clone, Default)]
pub struct PredictionSet {
    by_task: HashMap<String, TaskPredictions>,
    records: usize,
    skipped: usize,
}

impl PredictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse JSONL content; rows of another split are skipped unvalidated
    pub fn parse(source_label: &str, content: &str, split: &str) -> EvalResult<Self> {
        let mut set = Self::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let value: Value =
                serde_json::from_str(raw).map_err(|e| EvalError::InvalidJson {
                    source_label: source_label.to_string(),
                    line,
                    message: e.to_string(),
                })?;
            let Value::Object(object) = value else {
                return Err(EvalError::NotAnObject {
                    source_label: source_label.to_string(),
                    line,
                });
            };

            match object.get("split") {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) if s == split => {}
                Some(_) => {
                    set.skipped += 1;
                    continue;
                }
            }

            let record = PredictionRecord::from_object(&object, source_label, line)?;
            set.insert_record(record);
        }

        tracing::debug!(
            source = source_label,
            records = set.records,
            skipped = set.skipped,
            tasks = set.by_task.len(),
            "parsed predictions"
        );
        Ok(set)
    }

    /// Read and parse a JSONL file
    pub fn load(path: impl AsRef<Path>, split: &str) -> EvalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        Self::parse(&path.display().to_string(), &content, split)
    }

    /// Insert a record; a later record with the same task and id wins
    pub fn insert_record(&mut self, record: PredictionRecord) {
        self.records += 1;
        let previous = self
            .by_task
            .entry(record.task.clone())
            .or_default()
            .insert(record.id, record.prediction);
        if previous.is_some() {
            tracing::debug!(task = %record.task, id = record.id, "duplicate prediction id, keeping the last one");
        }
    }

    /// Insert a bare prediction
    pub fn insert(&mut self, task: impl Into<String>, id: u64, prediction: impl Into<String>) {
        self.insert_record(PredictionRecord {
            task: task.into(),
            id,
            prediction: prediction.into(),
            split: None,
            meta: None,
        });
    }

    /// Predictions for one task
    pub fn for_task(&self, task: &str) -> Option<&TaskPredictions> {
        self.by_task.get(task)
    }

    /// Task names present, sorted
    pub fn tasks(&self) -> Vec<String> {
        let mut tasks: Vec<String> = self.by_task.keys().cloned().collect();
        tasks.sort();
        tasks
    }

    /// Accepted rows, duplicates included
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Rows skipped because they belong to another split
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Distinct `(task, id)` predictions
    pub fn len(&self) -> usize {
        self.by_task.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
{"task":"hearsay","split":"test","id":0,"prediction":"Yes","meta":{"model":"m"}}
{"task":"hearsay","id":"1","prediction":"No"}

{"task":"abercrombie","split":"train","id":"bogus"}
{"task":"abercrombie","split":null,"id":4,"prediction":""}
"#;

    #[test]
    fn test_parse_and_filter_split() {
        let set = PredictionSet::parse("sample.jsonl", SAMPLE, "test").unwrap();
        assert_eq!(set.tasks(), vec!["abercrombie", "hearsay"]);
        assert_eq!(set.record_count(), 3);
        assert_eq!(set.skipped_count(), 1);

        let hearsay = set.for_task("hearsay").unwrap();
        assert_eq!(hearsay.get(&0).map(String::as_str), Some("Yes"));
        assert_eq!(hearsay.get(&1).map(String::as_str), Some("No"));
        assert_eq!(
            set.for_task("abercrombie").unwrap().get(&4).map(String::as_str),
            Some("")
        );
    }

    #[test]
    fn test_last_duplicate_wins() {
        let content = "{\"task\":\"t\",\"id\":0,\"prediction\":\"a\"}\n{\"task\":\"t\",\"id\":0,\"prediction\":\"b\"}\n";
        let set = PredictionSet::parse("dup.jsonl", content, "test").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.record_count(), 2);
        assert_eq!(set.for_task("t").unwrap()[&0], "b");
    }

    #[test]
    fn test_non_string_prediction_rendered_as_json() {
        let set = PredictionSet::parse("n.jsonl", r#"{"task":"t","id":0,"prediction":42}"#, "test")
            .unwrap();
        assert_eq!(set.for_task("t").unwrap()[&0], "42");
    }

    #[test]
    fn test_malformed_rows_are_fatal() {
        let cases = [
            ("not json", "Invalid JSONL at f.jsonl:1"),
            ("[1, 2]", "expected object"),
            (r#"{"id":0,"prediction":"x"}"#, "`task`"),
            (r#"{"task":"","id":0,"prediction":"x"}"#, "`task`"),
            (r#"{"task":"t","id":0}"#, "`prediction`"),
            (r#"{"task":"t","id":0,"prediction":null}"#, "`prediction`"),
            (r#"{"task":"t","id":-1,"prediction":"x"}"#, "invalid id -1"),
            (r#"{"task":"t","id":"1a","prediction":"x"}"#, "invalid id"),
            (r#"{"task":"t","id":1.5,"prediction":"x"}"#, "invalid id"),
            (r#"{"task":"t","prediction":"x"}"#, "invalid id null"),
        ];
        for (line, expected) in cases {
            let err = PredictionSet::parse("f.jsonl", line, "test").unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains(expected), "{:?} -> {}", line, msg);
            assert!(msg.contains("f.jsonl:1"), "{:?} -> {}", line, msg);
        }
    }

    #[test]
    fn test_error_reports_line_number() {
        let content = "{\"task\":\"t\",\"id\":0,\"prediction\":\"a\"}\n\n{\"task\":\"t\"}\n";
        let err = PredictionSet::parse("p.jsonl", content, "test").unwrap_err();
        assert!(err.to_string().contains("p.jsonl:3"));
    }
}
