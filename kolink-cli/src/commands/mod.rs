//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kolink_core::Automaton;
use kolink_engine::{AutomatonCache, CacheStatus, LoaderConfig};

use crate::config::CliConfig;
use crate::error::CliError;

pub mod compile;
pub mod generate_config;
pub mod scan;
pub mod stats;
pub mod validate;

/// Compile Korean dictionary entries into an Aho-Corasick automaton and
/// scan text for linkable expressions
#[derive(Debug, Parser)]
#[command(name = "kolink", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress progress output and logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the automaton from entry files
    Compile(compile::CompileArgs),

    /// Check entry files without building anything
    Validate(validate::ValidateArgs),

    /// Find linkable expressions in text
    Scan(scan::ScanArgs),

    /// Show automaton statistics
    Stats(stats::StatsArgs),

    /// Write a configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Cli {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();
        log::debug!("Arguments: {:?}", self);

        if let Commands::GenerateConfig(args) = &self.command {
            return args.execute();
        }

        let config = CliConfig::load(self.config.as_deref())?;
        match &self.command {
            Commands::Compile(args) => args.execute(&config),
            Commands::Validate(args) => args.execute(),
            Commands::Scan(args) => args.execute(&config, self.quiet),
            Commands::Stats(args) => args.execute(&config),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A second initialization (e.g. in tests) is harmless
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }
}

/// Load an automaton through the engine cache, failing loudly
///
/// Library callers degrade to an empty automaton; on the command line a
/// missing or corrupt file is an error.
pub fn load_automaton(config: &LoaderConfig) -> Result<Arc<Automaton>> {
    if !config.path.is_file() {
        return Err(CliError::FileNotFound(config.path.display().to_string()).into());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start async runtime")?;
    let cache = AutomatonCache::with_format(config.source(), config.format);
    let automaton = runtime.block_on(cache.load());

    if cache.status() == CacheStatus::Failed {
        let reason = cache.failure().unwrap_or_default();
        return Err(CliError::AutomatonUnavailable(reason).into());
    }
    Ok(automaton)
}

/// Loader configuration with an optional path override from the command line
pub(crate) fn loader_config(config: &CliConfig, path: Option<&PathBuf>) -> LoaderConfig {
    let mut loader = config.loader.clone();
    if let Some(path) = path {
        loader.path = path.clone();
    }
    loader
}
