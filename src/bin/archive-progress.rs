//! Archive Progress CLI Binary
//!
//! Command-line interface for archive progress reporting.

use anyhow::Context;
use archive_progress::logging::init_logging;
use archive_progress::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config =
        CliContext::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&cli.logging_config(&config.logging)).context("Failed to initialize logging")?;

    let context = CliContext::from_config(config, cli.snapshot.clone())
        .context("Failed to load archive snapshot")?;
    let output = context.execute(&cli.command)?;
    Ok(output)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
