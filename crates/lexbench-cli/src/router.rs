//! Command routing logic for CLI

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Score(args) => commands::score::run(args, cli.verbose).await,
        Commands::Tasks { tasks_dir, config } => commands::tasks::list(tasks_dir, config).await,
        Commands::Check { predictions, split } => commands::check::run(predictions, split).await,
        Commands::Report { input, format } => commands::report::render(input, format.into()).await,
    }
}
