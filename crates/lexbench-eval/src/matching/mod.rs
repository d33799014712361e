//! Per-example correctness matching
//!
//! Decides whether a single prediction counts as correct against a single
//! gold answer. Task families with differently shaped answers (free citation
//! text, multi-label extraction, currency amounts) get their own rule; every
//! other task uses normalized exact match.

mod normalize;

pub use normalize::{normalize_text, stem_minimal, stemmed_terms};

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Offset added to the gold value before dividing, so a zero gold never divides by zero
pub const NUMERIC_DENOMINATOR_OFFSET: f64 = 0.1;

/// Relative error strictly below this counts as correct
pub const NUMERIC_RELATIVE_TOLERANCE: f64 = 0.1;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));

/// Matching rule family for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Normalized exact string equality
    Default,
    /// Normalized gold must appear inside the normalized prediction
    OpenSetCitation,
    /// Comma-separated term lists, any stemmed overlap counts
    MultiAnswerExtraction,
    /// First number in the prediction within 10% of the gold amount
    NumericTolerance,
}

/// Tasks with a dedicated rule; everything else is [`TaskKind::Default`]
const SPECIAL_TASKS: &[(&str, TaskKind)] = &[
    ("citation_prediction_open", TaskKind::OpenSetCitation),
    ("definition_extraction", TaskKind::MultiAnswerExtraction),
    ("sara_numeric", TaskKind::NumericTolerance),
];

impl TaskKind {
    /// Resolve the rule family for a task identifier
    pub fn for_task(task: &str) -> Self {
        SPECIAL_TASKS
            .iter()
            .find(|(name, _)| *name == task)
            .map(|(_, kind)| *kind)
            .unwrap_or(TaskKind::Default)
    }

    /// Apply this rule to one prediction/gold pair
    pub fn is_correct(self, prediction: &str, gold: &str) -> bool {
        match self {
            TaskKind::Default => normalize_text(prediction) == normalize_text(gold),
            TaskKind::OpenSetCitation => citation_contained(prediction, gold),
            TaskKind::MultiAnswerExtraction => any_term_overlap(prediction, gold),
            TaskKind::NumericTolerance => within_numeric_tolerance(prediction, gold),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Default => "default",
            TaskKind::OpenSetCitation => "open_set_citation",
            TaskKind::MultiAnswerExtraction => "multi_answer_extraction",
            TaskKind::NumericTolerance => "numeric_tolerance",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Judge a single prediction for `task` against its gold answer
pub fn is_correct(task: &str, prediction: &str, gold: &str) -> bool {
    TaskKind::for_task(task).is_correct(prediction, gold)
}

fn citation_contained(prediction: &str, gold: &str) -> bool {
    let gold = normalize_text(gold);
    !gold.is_empty() && normalize_text(prediction).contains(&gold)
}

fn any_term_overlap(prediction: &str, gold: &str) -> bool {
    let golds = stemmed_terms(gold);
    stemmed_terms(prediction)
        .iter()
        .any(|term| golds.contains(term))
}

/// First digit run in `text` after dropping commas, or zero if there is none.
///
/// With `strip_periods` set, periods are dropped too and `1.5` reads as 15.
pub(crate) fn extract_number(text: &str, strip_periods: bool) -> f64 {
    let cleaned = if strip_periods {
        text.replace([',', '.'], "")
    } else {
        text.replace(',', "")
    };
    DIGIT_RUN
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Integer part of the first number in the prediction.
///
/// Commas are thousands separators; a period ends the digit run, so cents are
/// ignored rather than folded into the amount.
pub(crate) fn extract_predicted_number(prediction: &str) -> f64 {
    extract_number(prediction, false)
}

/// Gold amount as an integer, ignoring currency signs; zero when unparseable
fn parse_gold_amount(gold: &str) -> f64 {
    gold.replace('$', "")
        .trim()
        .parse::<i64>()
        .map(|v| v as f64)
        .unwrap_or(0.0)
}

pub(crate) fn numeric_close(predicted: f64, gold: f64) -> bool {
    (predicted / (gold + NUMERIC_DENOMINATOR_OFFSET) - 1.0).abs() < NUMERIC_RELATIVE_TOLERANCE
}

fn within_numeric_tolerance(prediction: &str, gold: &str) -> bool {
    numeric_close(extract_predicted_number(prediction), parse_gold_amount(gold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_kind_lookup() {
        assert_eq!(
            TaskKind::for_task("citation_prediction_open"),
            TaskKind::OpenSetCitation
        );
        assert_eq!(
            TaskKind::for_task("definition_extraction"),
            TaskKind::MultiAnswerExtraction
        );
        assert_eq!(TaskKind::for_task("sara_numeric"), TaskKind::NumericTolerance);
        assert_eq!(TaskKind::for_task("abercrombie"), TaskKind::Default);
        assert_eq!(TaskKind::for_task(""), TaskKind::Default);
    }

    #[test]
    fn test_default_rule() {
        assert!(is_correct("abercrombie", "Generic.", "generic"));
        assert!(is_correct("hearsay", "  YES ", "Yes"));
        assert!(!is_correct("hearsay", "No", "Yes"));
        assert!(!is_correct("hearsay", "", "Yes"));
    }

    #[test]
    fn test_default_rule_is_reflexive() {
        for s in ["Yes", "fraudulent conveyance", "A.B.C", "  mixed Case  "] {
            assert!(is_correct("any_task", s, s));
        }
    }

    #[test]
    fn test_citation_containment() {
        assert!(is_correct(
            "citation_prediction_open",
            "See Smith v. Jones, 1990",
            "Smith v. Jones"
        ));
        assert!(!is_correct(
            "citation_prediction_open",
            "Smith v. Brown",
            "Smith v. Jones"
        ));
        // an empty gold never matches, even an empty prediction
        assert!(!is_correct("citation_prediction_open", "", ""));
        assert!(!is_correct("citation_prediction_open", "anything", "..."));
    }

    #[test]
    fn test_multi_answer_overlap() {
        assert!(is_correct(
            "definition_extraction",
            "Licensed Products, Territory",
            "licensed product"
        ));
        assert!(is_correct(
            "definition_extraction",
            "warranties",
            "Services, Warranties"
        ));
        assert!(!is_correct("definition_extraction", "Territory", "Services"));
        assert!(!is_correct("definition_extraction", "", "Services"));
    }

    #[test]
    fn test_numeric_tolerance() {
        assert!(is_correct("sara_numeric", "$100.00", "100"));
        assert!(!is_correct("sara_numeric", "200", "100"));
        assert!(is_correct("sara_numeric", "The tax is $1,050", "$1000"));
        assert!(!is_correct("sara_numeric", "about 1200", "$1000"));
        // a period ends the digit run: "1.5" reads as 1
        assert_eq!(extract_predicted_number("1.5"), 1.0);
        assert!(is_correct("sara_numeric", "1.5", "1"));
        assert!(!is_correct("sara_numeric", "1.5", "15"));
    }

    #[test]
    fn test_numeric_defaults_to_zero() {
        // zero against zero is still a full relative miss: 0 / 0.1 - 1 = -1
        assert!(!is_correct("sara_numeric", "none", "n/a"));
        assert!(!is_correct("sara_numeric", "none", "500"));
        assert_eq!(extract_predicted_number("no numbers"), 0.0);
        assert_eq!(extract_predicted_number("owes 3,400.50 total"), 3400.0);
        assert_eq!(extract_number("owes 3,400.50 total", true), 340050.0);
    }
}
