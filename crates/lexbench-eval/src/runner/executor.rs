//! Run orchestration
//!
//! Ties gold data, predictions and the scoring function together and
//! produces an [`EvaluationRun`] for the report sinks.

use chrono::Utc;

use super::EvalConfig;
use crate::compare::PairedComparator;
use crate::error::EvalResult;
use crate::metrics::{ComparisonRecord, ComparisonRun, EvaluationRun, MetricsAggregator, TaskResult};
use crate::scoring::{TaskEvaluator, score_task};
use crate::tasks::{GoldProvider, PredictionSet, TsvGoldProvider};

/// Callback for progress updates during a run
pub type ProgressCallback = Box<dyn Fn(EvalProgress) + Send + Sync>;

/// Progress update during a run
#[derive(Debug, Clone)]
pub struct EvalProgress {
    /// Current task index (0-based)
    pub current: usize,
    /// Total number of tasks
    pub total: usize,
    /// Current task name
    pub task: String,
}

/// A prediction set together with the label reports show for it
#[derive(Debug, Clone, Copy)]
pub struct LabeledPredictions<'a> {
    pub label: &'a str,
    pub predictions: &'a PredictionSet,
}

impl<'a> LabeledPredictions<'a> {
    pub fn new(label: &'a str, predictions: &'a PredictionSet) -> Self {
        Self { label, predictions }
    }
}

/// Scores prediction sets and compares them against a baseline
pub struct EvalRunner {
    config: EvalConfig,
    evaluator: Box<dyn TaskEvaluator>,
    gold: Box<dyn GoldProvider>,
    progress_callback: Option<ProgressCallback>,
}

impl EvalRunner {
    /// Create a runner reading gold TSVs and scoring with the configured evaluator
    pub fn new(config: EvalConfig) -> EvalResult<Self> {
        config.validate()?;
        let evaluator = config.build_evaluator();
        let gold = Box::new(TsvGoldProvider::new(&config.tasks_dir, config.split.clone()));
        Ok(Self {
            config,
            evaluator,
            gold,
            progress_callback: None,
        })
    }

    /// Create a runner with explicit collaborators
    pub fn with_parts(
        config: EvalConfig,
        evaluator: Box<dyn TaskEvaluator>,
        gold: Box<dyn GoldProvider>,
    ) -> EvalResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            evaluator,
            gold,
            progress_callback: None,
        })
    }

    /// Set progress callback
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress_callback = Some(callback);
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Name of the scoring function in use
    pub fn evaluator_name(&self) -> &str {
        self.evaluator.name()
    }

    /// Score every task in `tasks` against the predictions
    pub fn evaluate(&self, predictions: &PredictionSet, tasks: &[String]) -> EvalResult<Vec<TaskResult>> {
        let mut results = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            self.emit_progress(index, tasks.len(), task);
            let gold = self.gold.load(task)?;
            results.push(score_task(
                task,
                &gold,
                predictions.for_task(task),
                self.evaluator.as_ref(),
            ));
        }
        Ok(results)
    }

    /// Paired comparison of `primary` against `baseline` for every task
    pub fn compare(
        &self,
        primary: &PredictionSet,
        baseline: &PredictionSet,
        tasks: &[String],
    ) -> EvalResult<Vec<ComparisonRecord>> {
        let comparator = self.comparator();
        let mut records = Vec::with_capacity(tasks.len());
        for task in tasks {
            let gold = self.gold.load(task)?;
            records.push(comparator.compare(
                task,
                &gold,
                primary.for_task(task),
                baseline.for_task(task),
            ));
        }
        Ok(records)
    }

    /// Score, optionally compare, and summarize one invocation
    pub fn run(
        &self,
        run_name: Option<&str>,
        primary: LabeledPredictions<'_>,
        baseline: Option<LabeledPredictions<'_>>,
        tasks: &[String],
    ) -> EvalResult<EvaluationRun> {
        tracing::info!(
            tasks = tasks.len(),
            evaluator = self.evaluator.name(),
            split = %self.config.split,
            "starting run"
        );

        let comparator = self.comparator();
        let mut results = Vec::with_capacity(tasks.len());
        let mut records = Vec::new();

        for (index, task) in tasks.iter().enumerate() {
            self.emit_progress(index, tasks.len(), task);
            let gold = self.gold.load(task)?;
            results.push(score_task(
                task,
                &gold,
                primary.predictions.for_task(task),
                self.evaluator.as_ref(),
            ));
            if let Some(baseline) = &baseline {
                records.push(comparator.compare(
                    task,
                    &gold,
                    primary.predictions.for_task(task),
                    baseline.predictions.for_task(task),
                ));
            }
        }

        let summary = MetricsAggregator::summarize(&results);
        tracing::info!(
            tasks = summary.task_count,
            scored = summary.scored_count,
            macro_average = ?summary.macro_average,
            "run complete"
        );

        Ok(EvaluationRun {
            run_name: run_name.map(str::to_string),
            predictions: primary.label.to_string(),
            evaluator: self.evaluator.name().to_string(),
            split: self.config.split.clone(),
            timestamp: Utc::now(),
            results,
            summary,
            comparison: baseline.map(|b| ComparisonRun {
                baseline: b.label.to_string(),
                ci_samples: self.config.ci_samples,
                ci_seed: self.config.ci_seed,
                records,
            }),
        })
    }

    fn comparator(&self) -> PairedComparator<'_> {
        PairedComparator::new(
            self.evaluator.as_ref(),
            self.config.ci_samples,
            self.config.ci_seed,
        )
    }

    fn emit_progress(&self, current: usize, total: usize, task: &str) {
        if let Some(callback) = &self.progress_callback {
            callback(EvalProgress {
                current,
                total,
                task: task.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::scoring::LegalBenchEvaluator;
    use crate::tasks::{GoldRow, GoldSet, InMemoryGoldProvider};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn gold_provider() -> InMemoryGoldProvider {
        let rows = (0..4)
            .map(|id| GoldRow {
                id,
                answer: (if id < 2 { "Yes" } else { "No" }).to_string(),
            })
            .collect();
        InMemoryGoldProvider::new().with_set(GoldSet::from_rows("hearsay", rows).unwrap())
    }

    fn runner() -> EvalRunner {
        EvalRunner::with_parts(
            EvalConfig::default().with_ci_samples(100),
            Box::new(LegalBenchEvaluator::new()),
            Box::new(gold_provider()),
        )
        .unwrap()
    }

    fn predictions(answers: &[&str]) -> PredictionSet {
        let mut set = PredictionSet::new();
        for (id, answer) in answers.iter().enumerate() {
            set.insert("hearsay", id as u64, *answer);
        }
        set
    }

    fn tasks() -> Vec<String> {
        vec!["hearsay".to_string(), "abercrombie".to_string()]
    }

    #[test]
    fn test_evaluate_keeps_going_past_missing_gold() {
        let results = runner()
            .evaluate(&predictions(&["Yes", "Yes", "No", "No"]), &tasks())
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, Some(1.0));
        assert_eq!(results[1].n_test, 0);
        assert_eq!(results[1].note.as_deref(), Some("missing gold data"));
    }

    #[test]
    fn test_run_with_comparison() {
        let primary = predictions(&["Yes", "Yes", "No", "No"]);
        let baseline = predictions(&["Yes", "No", "No", "Yes"]);
        let run = runner()
            .run(
                Some("nightly"),
                LabeledPredictions::new("primary.jsonl", &primary),
                Some(LabeledPredictions::new("baseline.jsonl", &baseline)),
                &tasks(),
            )
            .unwrap();

        assert_eq!(run.run_name.as_deref(), Some("nightly"));
        assert_eq!(run.evaluator, "builtin");
        assert_eq!(run.summary.task_count, 2);
        assert_eq!(run.summary.scored_count, 1);

        let comparison = run.comparison.unwrap();
        assert_eq!(comparison.baseline, "baseline.jsonl");
        assert_eq!(comparison.ci_samples, 100);
        assert_eq!(comparison.records.len(), 2);
        assert_eq!(comparison.records[0].wins, 2);
        assert_eq!(comparison.records[0].losses, 0);
        assert_eq!(comparison.records[0].delta, Some(0.5));
        assert_eq!(comparison.records[1].note.as_deref(), Some("missing gold data"));
    }

    #[test]
    fn test_compare_matches_run() {
        let runner = runner();
        let primary = predictions(&["Yes", "No", "No", "No"]);
        let baseline = predictions(&["No", "No", "No", "No"]);
        let records = runner.compare(&primary, &baseline, &tasks()).unwrap();
        let run = runner
            .run(
                None,
                LabeledPredictions::new("p", &primary),
                Some(LabeledPredictions::new("b", &baseline)),
                &tasks(),
            )
            .unwrap();
        assert_eq!(records, run.comparison.unwrap().records);
    }

    #[test]
    fn test_progress_callback() {
        let mut runner = runner();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        runner.set_progress_callback(Box::new(move |progress| {
            assert_eq!(progress.total, 2);
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        runner.evaluate(&PredictionSet::new(), &tasks()).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = EvalRunner::new(EvalConfig::default().with_ci_samples(0));
        assert!(matches!(result, Err(EvalError::Config(_))));
    }
}
