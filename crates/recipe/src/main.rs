//! Recipe CLI - processing recipe expansion.
//!
//! Provides commands for:
//! - `expand`: Expand a recipe template into a processing procedure
//! - `commands`: List the commands an expanded recipe would run
//! - `flags`: Print a before/after flag summary table

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CommandsArgs, ExpandArgs, FlagsArgs};
use output::Output;

/// Recipe - processing recipe expansion.
#[derive(Parser)]
#[command(name = "recipe", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a recipe template against a context.
    Expand(ExpandArgs),
    /// List the commands of an expanded recipe.
    Commands(CommandsArgs),
    /// Print a flag summary table from JSON records.
    Flags(FlagsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Expand(args) => args.execute(),
        Commands::Commands(args) => args.execute(),
        Commands::Flags(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
