//! Predictions file validation

use std::path::PathBuf;

use anyhow::Result;

use super::read_predictions;

/// Validate a predictions file and print per-task record counts
pub async fn run(predictions: PathBuf, split: String) -> Result<()> {
    let set = read_predictions(&predictions, &split).await?;

    println!("{:<40} {:>10}", "Task", "Predictions");
    println!("{:-<51}", "");
    for task in set.tasks() {
        let count = set.for_task(&task).map_or(0, |p| p.len());
        println!("{:<40} {:>10}", task, count);
    }
    println!("{:-<51}", "");
    println!(
        "records={} distinct={} skipped={} tasks={}",
        set.record_count(),
        set.len(),
        set.skipped_count(),
        set.tasks().len()
    );
    Ok(())
}
