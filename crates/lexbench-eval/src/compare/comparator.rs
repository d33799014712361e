//! Paired comparison of two prediction sets over one gold set

use super::bootstrap::bootstrap_ci_diff;
use super::exact_test::{DiscordantPairs, mcnemar_exact};
use crate::matching::TaskKind;
use crate::metrics::ComparisonRecord;
use crate::scoring::{TaskEvaluator, evaluate_quietly};
use crate::tasks::{GoldData, GoldSet, TaskPredictions};

/// Compares a primary run against a baseline, task by task.
///
/// Every call seeds its own generator, so records for different tasks do
/// not depend on the order in which they are computed.
pub struct PairedComparator<'a> {
    evaluator: &'a dyn TaskEvaluator,
    ci_samples: usize,
    seed: u64,
}

impl<'a> PairedComparator<'a> {
    pub fn new(evaluator: &'a dyn TaskEvaluator, ci_samples: usize, seed: u64) -> Self {
        Self {
            evaluator,
            ci_samples,
            seed,
        }
    }

    /// Compare one task; a task without gold data yields an empty record with a note
    pub fn compare(
        &self,
        task: &str,
        gold: &GoldData,
        primary: Option<&TaskPredictions>,
        baseline: Option<&TaskPredictions>,
    ) -> ComparisonRecord {
        match gold {
            GoldData::Available(set) => self.compare_set(task, set, primary, baseline),
            GoldData::Unavailable { note } => ComparisonRecord {
                task: task.to_string(),
                n_test: 0,
                score_primary: None,
                score_baseline: None,
                delta: None,
                wins: 0,
                losses: 0,
                ties: 0,
                ci: None,
                p_value: None,
                note: Some(note.clone()),
            },
        }
    }

    fn compare_set(
        &self,
        task: &str,
        set: &GoldSet,
        primary: Option<&TaskPredictions>,
        baseline: Option<&TaskPredictions>,
    ) -> ComparisonRecord {
        let align = |preds: Option<&TaskPredictions>| -> Vec<String> {
            set.rows()
                .iter()
                .map(|row| {
                    preds
                        .and_then(|p| p.get(&row.id))
                        .cloned()
                        .unwrap_or_default()
                })
                .collect()
        };

        self.compare_aligned(task, &set.answers(), &align(primary), &align(baseline))
    }

    /// Compare two prediction sequences already aligned with `answers`.
    ///
    /// A sequence shorter than `answers` is padded with empty predictions and
    /// a longer one is truncated, so every gold example is counted once.
    pub fn compare_aligned(
        &self,
        task: &str,
        answers: &[String],
        primary: &[String],
        baseline: &[String],
    ) -> ComparisonRecord {
        let primary = &fit_to(primary, answers.len());
        let baseline = &fit_to(baseline, answers.len());
        let score_primary = self.score_side(task, primary, answers);
        let score_baseline = self.score_side(task, baseline, answers);
        let delta = score_primary.zip(score_baseline).map(|(p, b)| p - b);

        let kind = TaskKind::for_task(task);
        let correctness = |preds: &[String]| -> Vec<bool> {
            preds
                .iter()
                .zip(answers)
                .map(|(p, g)| kind.is_correct(p, g))
                .collect()
        };
        let primary_correct = correctness(primary);
        let baseline_correct = correctness(baseline);

        let pairs = DiscordantPairs::count(&primary_correct, &baseline_correct);
        let n_test = answers.len();

        let record = ComparisonRecord {
            task: task.to_string(),
            n_test,
            score_primary,
            score_baseline,
            delta,
            wins: pairs.n10,
            losses: pairs.n01,
            ties: n_test - pairs.total(),
            ci: bootstrap_ci_diff(&primary_correct, &baseline_correct, self.ci_samples, self.seed),
            p_value: mcnemar_exact(pairs),
            note: None,
        };
        tracing::debug!(
            task,
            wins = record.wins,
            losses = record.losses,
            ties = record.ties,
            p_value = ?record.p_value,
            "compared task"
        );
        record
    }

    fn score_side(&self, task: &str, generations: &[String], answers: &[String]) -> Option<f64> {
        match evaluate_quietly(self.evaluator, task, generations, answers) {
            Ok(value) => value.as_finite(),
            Err(error) => {
                tracing::debug!(task, %error, "comparison side left unscored");
                None
            }
        }
    }
}

fn fit_to(preds: &[String], n: usize) -> Vec<String> {
    let mut fitted: Vec<String> = preds.iter().take(n).cloned().collect();
    fitted.resize(n, String::new());
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::LegalBenchEvaluator;
    use crate::tasks::GoldRow;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn comparator(evaluator: &LegalBenchEvaluator) -> PairedComparator<'_> {
        PairedComparator::new(evaluator, 1000, 1337)
    }

    #[test]
    fn test_identical_runs() {
        let evaluator = LegalBenchEvaluator::new();
        let answers = strings(&["Yes", "No", "Yes", "No"]);
        let preds = strings(&["Yes", "Yes", "No", "No"]);
        let record = comparator(&evaluator).compare_aligned("hearsay", &answers, &preds, &preds);

        assert_eq!(record.wins, 0);
        assert_eq!(record.losses, 0);
        assert_eq!(record.ties, 4);
        assert_eq!(record.delta, Some(0.0));
        assert_eq!(record.p_value, None);
        let ci = record.ci.unwrap();
        assert_eq!((ci.low, ci.high), (0.0, 0.0));
    }

    #[test]
    fn test_counts_partition_examples() {
        let evaluator = LegalBenchEvaluator::new();
        let answers = strings(&["Yes", "No", "Yes", "No", "Yes"]);
        let primary = strings(&["Yes", "No", "Yes", "Yes", "No"]);
        let baseline = strings(&["No", "No", "No", "No", "No"]);
        let record = comparator(&evaluator).compare_aligned("hearsay", &answers, &primary, &baseline);

        assert_eq!(record.wins, 2);
        assert_eq!(record.losses, 1);
        assert_eq!(record.ties, 2);
        assert_eq!(record.wins + record.losses + record.ties, record.n_test);
        // n=3, k=1: 2 * (1 + 3) / 8
        assert!((record.p_value.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reproducible_interval() {
        let evaluator = LegalBenchEvaluator::new();
        let answers: Vec<String> = (0..40)
            .map(|i| (if i % 2 == 0 { "Yes" } else { "No" }).to_string())
            .collect();
        let primary: Vec<String> = (0..40)
            .map(|i| (if i % 3 == 0 { "No" } else { "Yes" }).to_string())
            .collect();
        let baseline = vec!["Yes".to_string(); 40];

        let first = comparator(&evaluator).compare_aligned("hearsay", &answers, &primary, &baseline);
        let second = comparator(&evaluator).compare_aligned("hearsay", &answers, &primary, &baseline);
        assert_eq!(first.ci, second.ci);
        assert_eq!(first.p_value, second.p_value);
    }

    #[test]
    fn test_failed_side_leaves_delta_undefined() {
        let evaluator = LegalBenchEvaluator::new();
        let answers = strings(&["$100", "not a number"]);
        let primary = strings(&["100", "5"]);
        let baseline = strings(&["", ""]);
        let record = comparator(&evaluator).compare_aligned("sara_numeric", &answers, &primary, &baseline);

        assert_eq!(record.score_primary, None);
        assert_eq!(record.score_baseline, None);
        assert_eq!(record.delta, None);
        assert_eq!(record.n_test, 2);
    }

    #[test]
    fn test_missing_predictions_align_as_empty() {
        let evaluator = LegalBenchEvaluator::new();
        let rows = vec![
            GoldRow { id: 3, answer: "Yes".into() },
            GoldRow { id: 7, answer: "No".into() },
        ];
        let gold = GoldData::Available(GoldSet::from_rows("hearsay", rows).unwrap());
        let primary: TaskPredictions = [(3, "Yes".to_string()), (7, "No".to_string())].into();

        let record = comparator(&evaluator).compare("hearsay", &gold, Some(&primary), None);
        assert_eq!(record.wins, 2);
        assert_eq!(record.losses, 0);
        assert_eq!(record.score_primary, Some(1.0));
    }

    #[test]
    fn test_short_and_long_sequences_fit_answers() {
        let evaluator = LegalBenchEvaluator::new();
        let answers = strings(&["Yes", "No", "Yes"]);
        let primary = strings(&["Yes"]);
        let baseline = strings(&["No", "No", "No", "Yes"]);
        let record = comparator(&evaluator).compare_aligned("hearsay", &answers, &primary, &baseline);

        assert_eq!(record.n_test, 3);
        assert_eq!((record.wins, record.losses, record.ties), (1, 1, 1));
        assert!(record.ci.is_some());
    }

    #[test]
    fn test_unavailable_gold() {
        let evaluator = LegalBenchEvaluator::new();
        let record = comparator(&evaluator).compare(
            "hearsay",
            &GoldData::unavailable("missing test.tsv"),
            None,
            None,
        );
        assert_eq!(record.n_test, 0);
        assert_eq!(record.ci, None);
        assert_eq!(record.p_value, None);
        assert_eq!(record.note.as_deref(), Some("missing test.tsv"));
    }
}
