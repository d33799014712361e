//! Task catalog listing

use std::path::PathBuf;

use anyhow::Result;
use colored::*;
use lexbench_eval::tasks::TaskCatalog;

use super::load_config;

/// List the tasks found in the tasks directory
pub async fn list(tasks_dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let tasks_dir = tasks_dir.unwrap_or(config.tasks_dir);
    let tasks = TaskCatalog::new(&tasks_dir).discover()?;

    if tasks.is_empty() {
        println!("No tasks found in {}.", tasks_dir.display());
        return Ok(());
    }

    for task in &tasks {
        let has_split = tasks_dir
            .join(task)
            .join(format!("{}.tsv", config.split))
            .is_file();
        if has_split {
            println!("{}", task);
        } else {
            println!("{} {}", task, format!("(no {}.tsv)", config.split).dimmed());
        }
    }

    println!("\nTotal: {} tasks", tasks.len());
    Ok(())
}
