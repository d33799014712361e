//! LexBench CLI application
//!
//! Scores LegalBench prediction files, compares two runs and keeps an
//! append-only Markdown record of every invocation.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/lexbench-cli
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` for per-task detail.

mod args;
mod commands;
mod console;
mod router;

use args::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with environment-based filtering
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    router::route(cli).await
}
