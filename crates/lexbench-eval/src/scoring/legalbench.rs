//! Native LegalBench metrics
//!
//! Mirrors the benchmark's own `evaluation.evaluate` dispatch so runs can be
//! scored without a Python environment. Free-text families reuse the
//! per-example matcher; label tasks use balanced accuracy.

use std::collections::{BTreeMap, BTreeSet};

use super::{Evaluation, ScorerWarning, TaskEvaluator};
use crate::error::ScorerError;
use crate::matching::{TaskKind, extract_number, numeric_close};

/// Doctrine labels recognized in `successor_liability` generations
const SUCCESSOR_LIABILITY_CLASSES: [&str; 4] = [
    "express agreement",
    "fraudulent conveyance",
    "de facto merger",
    "mere continuation",
];

/// Tasks that can only be graded by hand
const MANUAL_EVAL_TASKS: [&str; 1] = ["rule_qa"];

/// Metric family used by the benchmark for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    BalancedAccuracy,
    SaraNumeric,
    MatcherAccuracy,
    SuccessorLiabilityF1,
    SslaF1,
    Manual,
}

impl Metric {
    fn for_task(task: &str) -> Self {
        if MANUAL_EVAL_TASKS.contains(&task) {
            return Metric::Manual;
        }
        if task.starts_with("ssla") {
            return Metric::SslaF1;
        }
        match task {
            "successor_liability" => Metric::SuccessorLiabilityF1,
            "sara_numeric" => Metric::SaraNumeric,
            _ => match TaskKind::for_task(task) {
                TaskKind::OpenSetCitation | TaskKind::MultiAnswerExtraction => {
                    Metric::MatcherAccuracy
                }
                _ => Metric::BalancedAccuracy,
            },
        }
    }
}

/// Built-in scorer implementing the LegalBench metric families
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalBenchEvaluator;

impl LegalBenchEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl TaskEvaluator for LegalBenchEvaluator {
    fn name(&self) -> &str {
        "builtin"
    }

    fn evaluate(
        &self,
        task: &str,
        generations: &[String],
        answers: &[String],
    ) -> Result<Evaluation, ScorerError> {
        if generations.len() != answers.len() {
            return Err(ScorerError::LengthMismatch {
                generations: generations.len(),
                answers: answers.len(),
            });
        }
        match Metric::for_task(task) {
            Metric::Manual => Err(ScorerError::ManualEvaluation {
                task: task.to_string(),
            }),
            _ if answers.is_empty() => Err(ScorerError::EmptyInput),
            Metric::BalancedAccuracy => Ok(balanced_accuracy(generations, answers)),
            Metric::SaraNumeric => sara_numeric_accuracy(generations, answers).map(Evaluation::number),
            Metric::MatcherAccuracy => {
                let kind = TaskKind::for_task(task);
                let correct = generations
                    .iter()
                    .zip(answers)
                    .filter(|(g, a)| kind.is_correct(g, a))
                    .count();
                Ok(Evaluation::number(correct as f64 / answers.len() as f64))
            }
            Metric::SuccessorLiabilityF1 => {
                successor_liability_f1(generations, answers).map(Evaluation::number)
            }
            Metric::SslaF1 => ssla_f1(generations, answers).map(Evaluation::number),
        }
    }
}

/// Drop ASCII punctuation, trim, lowercase
fn strip_punctuation(text: &str) -> String {
    let kept: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    kept.trim().to_lowercase()
}

/// Mean per-class recall over the classes present in the gold answers.
fn balanced_accuracy(generations: &[String], answers: &[String]) -> Evaluation {
    let truth: Vec<String> = answers.iter().map(|a| strip_punctuation(a)).collect();
    let predicted: Vec<String> = generations.iter().map(|g| strip_punctuation(g)).collect();

    // class -> (support, hits)
    let mut per_class: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for (t, p) in truth.iter().zip(&predicted) {
        let entry = per_class.entry(t.as_str()).or_default();
        entry.0 += 1;
        if t == p {
            entry.1 += 1;
        }
    }

    let recall_sum: f64 = per_class
        .values()
        .map(|(support, hits)| *hits as f64 / *support as f64)
        .sum();
    let mut evaluation = Evaluation::number(recall_sum / per_class.len() as f64);

    let unseen: BTreeSet<&str> = predicted
        .iter()
        .map(String::as_str)
        .filter(|p| !per_class.contains_key(p))
        .collect();
    if !unseen.is_empty() {
        evaluation = evaluation.with_warning(ScorerWarning::UnseenPredictedLabels {
            labels: unseen.into_iter().map(str::to_string).collect(),
        });
    }
    evaluation
}

/// Upstream `sara_numeric`: periods are removed along with commas, and a
/// gold value that is not an integer is an error.
fn sara_numeric_accuracy(generations: &[String], answers: &[String]) -> Result<f64, ScorerError> {
    let mut correct = 0usize;
    for (generation, answer) in generations.iter().zip(answers) {
        let predicted = extract_number(generation, true);
        let gold = answer
            .replace('$', "")
            .trim()
            .parse::<i64>()
            .map_err(|_| ScorerError::InvalidAnswer {
                answer: answer.clone(),
            })?;
        if numeric_close(predicted, gold as f64) {
            correct += 1;
        }
    }
    Ok(correct as f64 / answers.len() as f64)
}

fn f1(tp: usize, fp: usize, fn_: usize, metric: &'static str) -> Result<f64, ScorerError> {
    if tp + fp == 0 || tp + fn_ == 0 {
        return Err(ScorerError::ZeroDivision { metric });
    }
    let precision = tp as f64 / (tp + fp) as f64;
    let recall = tp as f64 / (tp + fn_) as f64;
    if precision + recall == 0.0 {
        return Err(ScorerError::ZeroDivision { metric });
    }
    Ok(2.0 * precision * recall / (precision + recall))
}

fn successor_liability_f1(generations: &[String], answers: &[String]) -> Result<f64, ScorerError> {
    let (mut tp, mut fp, mut fn_) = (0, 0, 0);
    for (generation, answer) in generations.iter().zip(answers) {
        let predictions: Vec<&str> = SUCCESSOR_LIABILITY_CLASSES
            .iter()
            .copied()
            .filter(|class| generation.contains(class))
            .collect();
        let expected: Vec<&str> = answer.split(',').collect();
        for p in &predictions {
            if expected.contains(p) {
                tp += 1;
            } else {
                fp += 1;
            }
        }
        fn_ += expected.iter().filter(|e| !predictions.contains(*e)).count();
    }
    f1(tp, fp, fn_, "successor_liability f1")
}

fn ssla_f1(generations: &[String], answers: &[String]) -> Result<f64, ScorerError> {
    let (mut tp, mut fp, mut fn_) = (0, 0, 0);
    for (generation, answer) in generations.iter().zip(answers) {
        let expected: Vec<String> = answer.split(',').map(|a| a.trim().to_lowercase()).collect();
        let produced: Vec<String> = generation
            .split(',')
            .map(|g| g.trim().to_lowercase())
            .collect();
        for g in &produced {
            if expected.iter().any(|a| g.contains(a.as_str())) {
                tp += 1;
            } else {
                fp += 1;
            }
        }
        fn_ += expected
            .iter()
            .filter(|a| !produced.iter().any(|g| g.contains(a.as_str())))
            .count();
    }
    f1(tp, fp, fn_, "ssla f1")
}
