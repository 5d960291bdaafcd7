//! Command implementations

mod ask;
mod extract;
mod schedule;
mod status;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match cli.command {
        Commands::Extract(args) => extract::execute(args, &output).await,
        Commands::Ask(args) => ask::execute(args, &output).await,
        Commands::Status(args) => status::execute(args, &output).await,
        Commands::Schedule(args) => schedule::execute(args, &output).await,
    }
}
