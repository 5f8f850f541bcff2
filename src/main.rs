//! shline - shell-safe command lines for long-lived shells
//!
//! Thin binary entry point that delegates to the subcommand handlers.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use shline::cli::{Cli, Commands};
use shline::commands::{handle_prepare, handle_quote, handle_run};
use shline::config::load_config;
use shline::logging::initialize_tracing;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    let loaded = load_config(args.config.as_deref())?;
    initialize_tracing(&loaded.config.logging, args.verbose)?;
    if let Some(path) = &loaded.path {
        tracing::debug!(path = %path.display(), "loaded configuration");
    }

    match &args.command {
        Commands::Prepare(prepare) => handle_prepare(prepare, &loaded.config)?,
        Commands::Quote(quote) => handle_quote(quote)?,
        Commands::Run(run) => return handle_run(run, &loaded.config).await,
    }
    Ok(ExitCode::SUCCESS)
}
