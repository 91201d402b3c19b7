//! Validate command implementation

use std::collections::HashSet;

use anyhow::Result;
use clap::Args;

use crate::error::CliError;
use crate::input::{load_entry_files, resolve_patterns, validate};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Entry files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        let files = resolve_patterns(&self.input)?;
        println!("Validating {} entry file(s)", files.len());

        let report = load_entry_files(&files);
        match validate(&report) {
            Ok(entries) => {
                let expressions: HashSet<&str> =
                    entries.iter().map(|entry| entry.korean.as_str()).collect();
                println!("✓ Entries are valid!");
                println!("  Entries: {}", entries.len());
                println!("  Distinct expressions: {}", expressions.len());
                Ok(())
            }
            Err(problems) => {
                println!("✗ Entries are invalid!");
                for problem in &problems {
                    println!("  {problem}");
                }
                Err(CliError::InvalidEntries(problems.len()).into())
            }
        }
    }
}
