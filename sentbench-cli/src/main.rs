//! sentbench command-line entry point

use anyhow::Result;
use clap::Parser;
use sentbench_cli::commands::Commands;

/// Benchmark sentence segmenters against a labeled corpus
#[derive(Debug, Parser)]
#[command(name = "sentbench", author, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    Cli::parse().command.execute()
}
