//! Scoring and comparison of prediction files

use std::path::Path;

use anyhow::{Context, Result};
use lexbench_eval::report::{JsonReporter, MarkdownReporter};
use lexbench_eval::runner::{EvalConfig, EvalProgress, EvalRunner, LabeledPredictions};
use lexbench_eval::tasks::{TaskCatalog, TaskSelection};

use super::{load_config, read_predictions};
use crate::args::ScoreArgs;
use crate::console::CliConsole;

/// Command-line flags win over the configuration file
fn apply_overrides(mut config: EvalConfig, args: &ScoreArgs) -> EvalConfig {
    if let Some(dir) = &args.legalbench_dir {
        config = config.with_legalbench_dir(dir);
    }
    if let Some(dir) = &args.tasks_dir {
        config = config.with_tasks_dir(dir);
    }
    if let Some(split) = &args.split {
        config = config.with_split(split);
    }
    if let Some(report) = &args.report {
        config = config.with_report_path(report);
    }
    if let Some(samples) = args.ci_samples {
        config = config.with_ci_samples(samples);
    }
    if let Some(seed) = args.ci_seed {
        config = config.with_ci_seed(seed);
    }
    if let Some(scorer) = args.scorer {
        config = config.with_scorer(scorer.into());
    }
    if let Some(python) = &args.python {
        config = config.with_python(python);
    }
    config
}

fn selection(args: &ScoreArgs) -> TaskSelection {
    if args.all_tasks {
        TaskSelection::All
    } else if let Some(list) = &args.tasks {
        TaskSelection::from_list(list)
    } else {
        TaskSelection::FromPredictions
    }
}

async fn write_json(path: &Path, json: String) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Score predictions, optionally compare against a baseline, and append the report
pub async fn run(args: ScoreArgs, verbose: bool) -> Result<()> {
    let console = CliConsole::new(verbose);
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    config.validate()?;

    let predictions = read_predictions(&args.predictions, &config.split).await?;
    let baseline = match &args.compare {
        Some(path) => Some(read_predictions(path, &config.split).await?),
        None => None,
    };
    if predictions.skipped_count() > 0 {
        console.info(&format!(
            "Skipped {} rows outside split `{}`",
            predictions.skipped_count(),
            config.split
        ));
    }

    let tasks = selection(&args).resolve(&TaskCatalog::new(&config.tasks_dir), &predictions)?;
    if tasks.is_empty() {
        console.warn("No tasks selected");
    }

    let report_path = config.report_path.clone();
    let mut runner = EvalRunner::new(config)?;
    let progress = CliConsole::new(verbose);
    runner.set_progress_callback(Box::new(move |p: EvalProgress| {
        progress.progress(p.current, p.total, &p.task);
    }));

    let primary_label = args.predictions.display().to_string();
    let baseline_label = args.compare.as_ref().map(|p| p.display().to_string());
    let run_name = args.run_name.clone();

    // The python scorer spawns a process per task; keep it off the runtime threads
    let run = tokio::task::spawn_blocking(move || {
        let baseline = baseline
            .as_ref()
            .zip(baseline_label.as_deref())
            .map(|(set, label)| LabeledPredictions::new(label, set));
        runner.run(
            run_name.as_deref(),
            LabeledPredictions::new(&primary_label, &predictions),
            baseline,
            &tasks,
        )
    })
    .await
    .context("Scoring task panicked")??;

    MarkdownReporter::append(&report_path, &run)?;
    if let Some(path) = &args.json_out {
        write_json(path, JsonReporter::generate(&run)?).await?;
        console.info(&format!("Wrote {}", path.display()));
    }
    if let Some(comparison) = &run.comparison {
        console.success(&format!(
            "Compared {} tasks against {}",
            comparison.records.len(),
            comparison.baseline
        ));
    }

    println!(
        "tasks={} scored={} report={}",
        run.summary.task_count,
        run.summary.scored_count,
        report_path.display()
    );
    Ok(())
}
