//! esm-endian CLI - command-line interface for the endianness converter.

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "esm-endian")]
#[command(about = "Xbox 360 to PC ESM/ESP/ESL endianness converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn is_verbose(command: &Commands) -> bool {
    match command {
        Commands::Convert { verbose, .. } => *verbose,
    }
}

/// Run the esm-endian CLI.
///
/// # Errors
/// Returns an error if the selected command fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if is_verbose(&cli.command) { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    cli.command.execute()
}
