//! Bridge to the benchmark's own Python `evaluation` module
//!
//! Each call runs the interpreter once with the LegalBench checkout on
//! `sys.path`. Inputs go in as JSON on stdin; the reply is a single JSON
//! object on stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use super::{Evaluation, ScoreValue, ScorerWarning, TaskEvaluator};
use crate::error::ScorerError;

const BRIDGE_SCRIPT: &str = r#"
import json, math, sys, warnings
sys.path.insert(0, sys.argv[1])
task = sys.argv[2]
payload = json.load(sys.stdin)
out = {"warnings": []}
try:
    import evaluation
    with warnings.catch_warnings(record=True) as caught:
        warnings.simplefilter("always")
        value = evaluation.evaluate(task, payload["generations"], payload["answers"])
    out["warnings"] = [str(w.message) for w in caught]
    if isinstance(value, (int, float)) and math.isfinite(float(value)):
        out["score"] = float(value)
    else:
        out["non_numeric"] = repr(value)
except Exception as e:
    out["error"] = {"kind": type(e).__name__, "message": str(e)}
sys.stdout.write(json.dumps(out) + "\n")
"#;

#[derive(Serialize)]
struct BridgeRequest<'a> {
    generations: &'a [String],
    answers: &'a [String],
}

#[derive(Debug, Deserialize)]
struct BridgeError {
    kind: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct BridgeResponse {
    #[serde(default)]
    warnings: Vec<String>,
    score: Option<f64>,
    non_numeric: Option<String>,
    error: Option<BridgeError>,
}

impl BridgeResponse {
    fn into_evaluation(self) -> Result<Evaluation, ScorerError> {
        if let Some(error) = self.error {
            return Err(ScorerError::Raised {
                kind: error.kind,
                message: error.message,
            });
        }
        let value = match (self.score, self.non_numeric) {
            (Some(score), _) => ScoreValue::Number(score),
            (None, Some(repr)) => ScoreValue::NonNumeric(repr),
            (None, None) => {
                return Err(ScorerError::Process(
                    "bridge reply carried neither score nor error".to_string(),
                ));
            }
        };
        Ok(Evaluation {
            value,
            warnings: self
                .warnings
                .into_iter()
                .map(ScorerWarning::from_message)
                .collect(),
        })
    }
}

/// Scores tasks by delegating to `<legalbench_dir>/evaluation.py`
#[derive(Debug, Clone)]
pub struct PythonEvaluator {
    python: String,
    legalbench_dir: PathBuf,
}

impl PythonEvaluator {
    pub fn new(python: impl Into<String>, legalbench_dir: impl AsRef<Path>) -> Self {
        Self {
            python: python.into(),
            legalbench_dir: legalbench_dir.as_ref().to_path_buf(),
        }
    }

    fn run_bridge(&self, task: &str, request: &BridgeRequest<'_>) -> Result<String, ScorerError> {
        let input = serde_json::to_vec(request).map_err(|e| ScorerError::Process(e.to_string()))?;

        let mut child = Command::new(&self.python)
            .arg("-c")
            .arg(BRIDGE_SCRIPT)
            .arg(&self.legalbench_dir)
            .arg(task)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ScorerError::Process(format!("failed to start {}: {}", self.python, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&input) {
                // the interpreter quit before reading its input; reap it
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(ScorerError::Process(format!(
                    "failed to send input to {}: {}",
                    self.python, e
                )));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| ScorerError::Process(e.to_string()))?;
        if !output.status.success() {
            return Err(ScorerError::Process(format!(
                "{} exited with {}: {}",
                self.python,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn parse_reply(stdout: &str) -> Result<Evaluation, ScorerError> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| ScorerError::Process("empty reply from scorer".to_string()))?;
    let response: BridgeResponse =
        serde_json::from_str(line).map_err(|e| ScorerError::Process(e.to_string()))?;
    response.into_evaluation()
}

impl TaskEvaluator for PythonEvaluator {
    fn name(&self) -> &str {
        "python"
    }

    fn evaluate(
        &self,
        task: &str,
        generations: &[String],
        answers: &[String],
    ) -> Result<Evaluation, ScorerError> {
        let request = BridgeRequest {
            generations,
            answers,
        };
        let stdout = self.run_bridge(task, &request)?;
        parse_reply(&stdout)
    }
}
