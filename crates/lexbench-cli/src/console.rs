//! CLI console utilities
//!
//! Status output goes to stderr so stdout stays machine-readable.

use colored::*;

/// CLI console for formatted status output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            eprintln!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print a per-task progress line (verbose only)
    pub fn progress(&self, current: usize, total: usize, task: &str) {
        if self.verbose {
            eprintln!("{} {}", format!("[{}/{}]", current + 1, total).dimmed(), task);
        }
    }
}
