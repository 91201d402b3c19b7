//! Kolink command-line entry point

use clap::Parser;
use kolink_cli::commands::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().execute()
}
