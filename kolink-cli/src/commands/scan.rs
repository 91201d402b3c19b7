//! Scan command implementation

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use kolink_core::Automaton;
use rayon::prelude::*;

use super::{load_automaton, loader_config};
use crate::config::CliConfig;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{
    JsonFormatter, MarkdownFormatter, OutputFormatter, ScannedDocument, TextFormatter,
};
use crate::progress::ProgressReporter;

/// Label used for text given with `--text`
const INLINE_TEXT_NAME: &str = "<text>";

/// Arguments for the scan command
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Serialized automaton (default: loader path from configuration)
    #[arg(short, long, value_name = "FILE")]
    pub automaton: Option<PathBuf>,

    /// Input files or patterns (supports glob)
    #[arg(
        short,
        long,
        value_name = "FILE/PATTERN",
        required_unless_present = "text",
        conflicts_with = "text"
    )]
    pub input: Vec<String>,

    /// Scan this text instead of files
    #[arg(short, long)]
    pub text: Option<String>,

    /// Identifier to leave unlinked, e.g. the entry of the current page
    #[arg(short, long, value_name = "ID")]
    pub exclude: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Worker threads for scanning files (0 = auto)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One match per line
    Text,
    /// JSON array of documents with their matches
    Json,
    /// Markdown with matches rendered as links
    Markdown,
}

impl ScanArgs {
    /// Execute the scan command
    pub fn execute(&self, config: &CliConfig, quiet: bool) -> Result<()> {
        let loader = loader_config(config, self.automaton.as_ref());
        let automaton = load_automaton(&loader)?;
        let exclude = self.exclude.as_deref();

        let documents = match &self.text {
            Some(text) => vec![scan_document(&automaton, INLINE_TEXT_NAME, text.clone(), exclude)],
            None => {
                let files = resolve_patterns(&self.input)?;
                let threads = config.performance.resolve_threads(self.threads);
                log::info!("Scanning {} file(s) on {} thread(s)", files.len(), threads);
                self.scan_files(&automaton, &files, threads, quiet)?
            }
        };

        let mut formatter = self.create_formatter(config)?;
        for document in &documents {
            formatter.format_document(document)?;
        }
        formatter.finish()?;

        let total: usize = documents.iter().map(|document| document.spans.len()).sum();
        log::info!("Found {} match(es) in {} input(s)", total, documents.len());
        Ok(())
    }

    /// Scan files in parallel, keeping input order
    fn scan_files(
        &self,
        automaton: &Automaton,
        files: &[PathBuf],
        threads: usize,
        quiet: bool,
    ) -> Result<Vec<ScannedDocument>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build thread pool")?;

        let mut progress = ProgressReporter::new(quiet);
        progress.init_files(files.len() as u64);

        let exclude = self.exclude.as_deref();
        let documents = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let text = FileReader::read_text(path)?;
                    let name = path.display().to_string();
                    let document = scan_document(automaton, &name, text, exclude);
                    progress.file_completed(&name);
                    Ok(document)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        progress.finish();
        Ok(documents)
    }

    fn create_formatter(&self, config: &CliConfig) -> Result<Box<dyn OutputFormatter>> {
        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(BufWriter::new(io::stdout())),
        };

        let formatter: Box<dyn OutputFormatter> = match self.format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, config.output.pretty_json)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(
                writer,
                config.output.link_template.as_str(),
            )),
        };
        Ok(formatter)
    }
}

fn scan_document(
    automaton: &Automaton,
    name: &str,
    text: String,
    exclude: Option<&str>,
) -> ScannedDocument {
    let spans = automaton.scan(&text, exclude);
    log::debug!("{name}: {} match(es)", spans.len());
    ScannedDocument {
        name: name.to_string(),
        text,
        spans,
    }
}
