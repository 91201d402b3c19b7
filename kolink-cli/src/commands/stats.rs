//! Stats command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{load_automaton, loader_config};
use crate::config::CliConfig;

/// Arguments for the stats command
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Serialized automaton (default: loader path from configuration)
    #[arg(short, long, value_name = "FILE")]
    pub automaton: Option<PathBuf>,

    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsArgs {
    /// Execute the stats command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let loader = loader_config(config, self.automaton.as_ref());
        let automaton = load_automaton(&loader)?;
        let stats = automaton.stats();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("Automaton: {}", loader.path.display());
            println!("  Nodes:        {}", stats.node_count);
            println!("  Expressions:  {}", stats.expression_count);
            println!("  Identifiers:  {}", stats.identifier_count);
        }
        Ok(())
    }
}
