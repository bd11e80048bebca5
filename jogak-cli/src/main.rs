//! jogak command-line entry point

use clap::Parser;
use jogak_cli::commands::Commands;

/// Boundary-aware chunking of parsed procurement documents
#[derive(Debug, Parser)]
#[command(name = "jogak", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    Cli::parse().command.execute()
}
