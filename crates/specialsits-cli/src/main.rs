//! SpecialSits CLI - Command-line interface
//!
//! This is the main CLI adapter for the SpecialSits extraction system.

mod cli;
mod commands;
mod output;
mod progress;
mod session;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async { commands::execute(cli).await })?;

    Ok(())
}
