//! CLI argument definitions using clap
//!
//! - lexbench score --predictions P [--compare B]   # Score, optionally compare
//! - lexbench tasks                                 # List the task catalog
//! - lexbench check --predictions P                 # Validate a predictions file
//! - lexbench report --input run.json               # Re-render a saved run

use clap::{Args, Parser, Subcommand, ValueEnum};
use lexbench_eval::ScorerKind;
use lexbench_eval::report::ReportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lexbench")]
#[command(about = "Score LegalBench predictions and compare runs")]
#[command(version)]
pub struct Cli {
    /// Print per-task progress to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a predictions file and append the results to the report
    Score(ScoreArgs),

    /// List the tasks found in the tasks directory
    Tasks {
        /// Directory holding one subdirectory per task
        #[arg(long)]
        tasks_dir: Option<PathBuf>,

        /// TOML configuration file
        #[arg(long, env = "LEXBENCH_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Validate a predictions file and show per-task record counts
    Check {
        /// Predictions JSONL file
        #[arg(long)]
        predictions: PathBuf,

        /// Evaluation split
        #[arg(long, default_value = "test")]
        split: String,
    },

    /// Render a run saved with `score --json-out`
    Report {
        /// JSON run file
        #[arg(long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: FormatArg,
    },
}

/// Options of `lexbench score`; unset options fall back to the config file, then defaults
#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Predictions JSONL file
    #[arg(long)]
    pub predictions: PathBuf,

    /// Baseline predictions JSONL to compare against
    #[arg(long)]
    pub compare: Option<PathBuf>,

    /// Markdown report path [default: docs/legalbench-results.md]
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Run name shown in the report
    #[arg(long)]
    pub run_name: Option<String>,

    /// LegalBench checkout [default: data/legalbench]
    #[arg(long)]
    pub legalbench_dir: Option<PathBuf>,

    /// Tasks directory [default: data/legalbench/tasks]
    #[arg(long)]
    pub tasks_dir: Option<PathBuf>,

    /// Comma-separated task names
    #[arg(long, conflicts_with = "all_tasks")]
    pub tasks: Option<String>,

    /// Score every task in the tasks directory
    #[arg(long)]
    pub all_tasks: bool,

    /// Evaluation split [default: test]
    #[arg(long)]
    pub split: Option<String>,

    /// Bootstrap resamples per compared task [default: 1000]
    #[arg(long)]
    pub ci_samples: Option<usize>,

    /// Bootstrap seed [default: 1337]
    #[arg(long)]
    pub ci_seed: Option<u64>,

    /// Scoring function [default: builtin]
    #[arg(long, value_enum)]
    pub scorer: Option<ScorerArg>,

    /// Python interpreter for the python scorer [default: python3]
    #[arg(long)]
    pub python: Option<String>,

    /// Also write the run as JSON
    #[arg(long)]
    pub json_out: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, env = "LEXBENCH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScorerArg {
    /// Native metric implementations
    Builtin,
    /// The benchmark's evaluation.py
    Python,
}

impl From<ScorerArg> for ScorerKind {
    fn from(arg: ScorerArg) -> Self {
        match arg {
            ScorerArg::Builtin => ScorerKind::Builtin,
            ScorerArg::Python => ScorerKind::Python,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Markdown,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => ReportFormat::Markdown,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_score_args() {
        let cli = Cli::parse_from([
            "lexbench",
            "score",
            "--predictions",
            "p.jsonl",
            "--compare",
            "b.jsonl",
            "--tasks",
            "hearsay,abercrombie",
            "--ci-samples",
            "200",
            "--scorer",
            "python",
        ]);
        let Commands::Score(args) = cli.command else {
            panic!("expected score");
        };
        assert_eq!(args.predictions, PathBuf::from("p.jsonl"));
        assert_eq!(args.compare, Some(PathBuf::from("b.jsonl")));
        assert_eq!(args.ci_samples, Some(200));
        assert_eq!(args.ci_seed, None);
        assert_eq!(args.scorer, Some(ScorerArg::Python));
        assert!(!args.all_tasks);
    }

    #[test]
    fn test_tasks_conflicts_with_all_tasks() {
        let result = Cli::try_parse_from([
            "lexbench",
            "score",
            "--predictions",
            "p.jsonl",
            "--tasks",
            "hearsay",
            "--all-tasks",
        ]);
        assert!(result.is_err());
    }
}
