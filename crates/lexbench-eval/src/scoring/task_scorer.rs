//! Scoring of a single task
//!
//! Failures of the scoring function never escape: they become a result
//! without a score and an `eval_error: <kind>` note.

use super::{ScoreValue, TaskEvaluator, evaluate_quietly};
use crate::metrics::TaskResult;
use crate::tasks::{GoldData, TaskPredictions};

/// Score one task's predictions against its gold data
pub fn score_task(
    task: &str,
    gold: &GoldData,
    predictions: Option<&TaskPredictions>,
    evaluator: &dyn TaskEvaluator,
) -> TaskResult {
    let set = match gold {
        GoldData::Available(set) => set,
        GoldData::Unavailable { note } => {
            tracing::warn!(task, note = %note, "no gold data, task left unscored");
            return TaskResult::unavailable(task, note.clone());
        }
    };

    let mut answers = Vec::with_capacity(set.len());
    let mut generations = Vec::with_capacity(set.len());
    let mut n_pred = 0;

    for row in set.rows() {
        answers.push(row.answer.clone());
        match predictions.and_then(|p| p.get(&row.id)) {
            Some(prediction) => {
                generations.push(prediction.clone());
                n_pred += 1;
            }
            None => generations.push(String::new()),
        }
    }

    let n_test = answers.len();
    let (score, note) = match evaluate_quietly(evaluator, task, &generations, &answers) {
        Ok(value) => match value.as_finite() {
            Some(score) => (Some(score), None),
            None => {
                let shown = match &value {
                    ScoreValue::Number(v) => v.to_string(),
                    ScoreValue::NonNumeric(repr) => repr.clone(),
                };
                tracing::warn!(task, value = %shown, "scorer returned a non-numeric value");
                (None, Some("non_numeric_score".to_string()))
            }
        },
        Err(error) => {
            tracing::warn!(task, evaluator = evaluator.name(), %error, "scoring failed");
            (None, Some(format!("eval_error: {}", error.kind())))
        }
    };

    let result = TaskResult::new(task, n_test, n_pred, score, note);
    tracing::debug!(
        task,
        n_test = result.n_test,
        n_pred = result.n_pred,
        coverage = result.coverage,
        score = ?result.score,
        "scored task"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScorerError;
    use crate::scoring::{Evaluation, LegalBenchEvaluator};
    use crate::tasks::{GoldRow, GoldSet};

    fn gold(n: u64) -> GoldData {
        let rows = (0..n)
            .map(|id| GoldRow {
                id,
                answer: (if id % 2 == 0 { "Yes" } else { "No" }).to_string(),
            })
            .collect();
        GoldData::Available(GoldSet::from_rows("hearsay", rows).unwrap())
    }

    fn six_of_ten() -> TaskPredictions {
        (0..6).map(|id| (id, "Yes".to_string())).collect()
    }

    fn failing(_: &str, _: &[String], _: &[String]) -> Result<Evaluation, ScorerError> {
        Err(ScorerError::Raised {
            kind: "KeyError".to_string(),
            message: "'hearsay'".to_string(),
        })
    }

    fn non_numeric(_: &str, _: &[String], _: &[String]) -> Result<Evaluation, ScorerError> {
        Ok(Evaluation {
            value: ScoreValue::NonNumeric("None".to_string()),
            warnings: Vec::new(),
        })
    }

    fn echo_lengths(_: &str, g: &[String], a: &[String]) -> Result<Evaluation, ScorerError> {
        assert_eq!(g.len(), a.len());
        let filled = g.iter().filter(|s| !s.is_empty()).count();
        Ok(Evaluation::number(filled as f64))
    }

    #[test]
    fn test_coverage_and_alignment() {
        let preds = six_of_ten();
        let result = score_task("hearsay", &gold(10), Some(&preds), &echo_lengths);
        assert_eq!(result.n_test, 10);
        assert_eq!(result.n_pred, 6);
        assert_eq!(result.coverage, 0.6);
        assert_eq!(result.score, Some(6.0));
        assert_eq!(result.note, None);
    }

    #[test]
    fn test_scorer_failure_becomes_note() {
        let preds = six_of_ten();
        let result = score_task("hearsay", &gold(10), Some(&preds), &failing);
        assert_eq!(result.coverage, 0.6);
        assert_eq!(result.score, None);
        assert!(result.note.as_deref().unwrap().starts_with("eval_error:"));
        assert_eq!(result.note.as_deref(), Some("eval_error: KeyError"));
    }

    #[test]
    fn test_non_numeric_score() {
        let result = score_task("hearsay", &gold(2), None, &non_numeric);
        assert_eq!(result.score, None);
        assert_eq!(result.coverage, 0.0);
        assert_eq!(result.note.as_deref(), Some("non_numeric_score"));
    }

    #[test]
    fn test_unavailable_gold() {
        let result = score_task(
            "missing",
            &GoldData::unavailable("missing test.tsv"),
            None,
            &LegalBenchEvaluator::new(),
        );
        assert_eq!(result.n_test, 0);
        assert_eq!(result.n_pred, 0);
        assert_eq!(result.coverage, 0.0);
        assert_eq!(result.note.as_deref(), Some("missing test.tsv"));
    }

    #[test]
    fn test_builtin_scorer_end_to_end() {
        // gold alternates Yes/No; every prediction is Yes
        let preds: TaskPredictions = (0..4).map(|id| (id, "Yes".to_string())).collect();
        let result = score_task("hearsay", &gold(4), Some(&preds), &LegalBenchEvaluator::new());
        assert_eq!(result.score, Some(0.5));
        assert_eq!(result.coverage, 1.0);
    }
}
