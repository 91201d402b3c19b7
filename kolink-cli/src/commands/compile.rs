//! Compile command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use kolink_core::{AutomatonBuilder, WireFormat};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{load_entry_files, order_by_length, resolve_patterns, validate, FileReader};

/// File name of the JSON automaton
pub const JSON_FILE_NAME: &str = "expression-trie.json";

/// File name of the binary automaton
pub const BINARY_FILE_NAME: &str = "trie.bin";

/// Arguments for the compile command
#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Entry files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Formats to write (default: from configuration)
    #[arg(short, long, value_enum)]
    pub format: Option<CompileFormat>,

    /// Keep file order instead of sorting expressions longest first
    #[arg(long)]
    pub keep_order: bool,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CompileFormat {
    /// JSON node array
    Json,
    /// Compact binary table
    Binary,
    /// Both files
    Both,
}

impl CompileFormat {
    fn formats(self) -> Vec<WireFormat> {
        match self {
            CompileFormat::Json => vec![WireFormat::Json],
            CompileFormat::Binary => vec![WireFormat::Binary],
            CompileFormat::Both => vec![WireFormat::Json, WireFormat::Binary],
        }
    }
}

/// Output file name for a format
pub fn file_name(format: WireFormat) -> &'static str {
    match format {
        WireFormat::Json => JSON_FILE_NAME,
        WireFormat::Binary => BINARY_FILE_NAME,
    }
}

impl CompileArgs {
    /// Execute the compile command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        log::info!("Compiling entries into {}", self.output.display());

        let files = resolve_patterns(&self.input)?;
        let report = load_entry_files(&files);
        let mut entries = match validate(&report) {
            Ok(entries) => entries,
            Err(problems) => {
                for problem in &problems {
                    eprintln!("✗ {problem}");
                }
                return Err(CliError::InvalidEntries(problems.len()).into());
            }
        };

        if config.compile.sort_by_length && !self.keep_order {
            order_by_length(&mut entries);
        }

        let mut builder = AutomatonBuilder::new();
        for entry in &entries {
            builder
                .insert(entry.id.as_str(), &entry.korean)
                .context("Failed to build automaton")?;
        }
        let automaton = builder.build();
        let stats = automaton.stats();
        log::info!(
            "Automaton built: {} nodes, {} expressions, {} identifiers",
            stats.node_count,
            stats.expression_count,
            stats.identifier_count
        );

        let formats = match self.format {
            Some(selection) => selection.formats(),
            None => config.compile.formats.clone(),
        };
        if formats.is_empty() {
            return Err(CliError::ConfigError("no output formats selected".to_string()).into());
        }

        let mut sizes = Vec::with_capacity(formats.len());
        for format in formats {
            let bytes = kolink_core::encode(&automaton, format)
                .with_context(|| format!("Failed to encode {format} automaton"))?;
            let path = self.output.join(file_name(format));
            FileReader::write_bytes(&path, &bytes)?;
            println!("✓ {} ({} bytes)", path.display(), bytes.len());
            sizes.push((format, bytes.len()));
        }

        let size_of = |wanted: WireFormat| {
            sizes
                .iter()
                .find(|(format, _)| *format == wanted)
                .map(|&(_, len)| len)
        };
        if let (Some(json), Some(binary)) = (size_of(WireFormat::Json), size_of(WireFormat::Binary))
        {
            log::info!(
                "JSON {:.1}KB -> binary {:.1}KB ({:.1}% smaller)",
                json as f64 / 1024.0,
                binary as f64 / 1024.0,
                saving_percent(json, binary)
            );
        }

        println!(
            "  {} entries from {} files: {} nodes, {} expressions, {} identifiers",
            entries.len(),
            files.len(),
            stats.node_count,
            stats.expression_count,
            stats.identifier_count
        );

        Ok(())
    }
}

fn saving_percent(json: usize, binary: usize) -> f64 {
    if json == 0 {
        return 0.0;
    }
    (1.0 - binary as f64 / json as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolink_core::Automaton;
    use std::fs;
    use tempfile::TempDir;

    fn write_entries(dir: &TempDir, content: &str) -> String {
        let path = dir.path().join("entries.json");
        fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    fn args(input: String, output: PathBuf, format: Option<CompileFormat>) -> CompileArgs {
        CompileArgs {
            input: vec![input],
            output,
            format,
            keep_order: false,
        }
    }

    #[test]
    fn test_compile_writes_both_formats() {
        let dir = TempDir::new().unwrap();
        let input = write_entries(
            &dir,
            r#"[{"id": "id1", "korean": "안녕"}, {"id": "id2", "korean": "안녕하세요"}]"#,
        );
        let out = dir.path().join("out");

        args(input, out.clone(), None)
            .execute(&CliConfig::default())
            .unwrap();

        let json = Automaton::from_json(&fs::read(out.join(JSON_FILE_NAME)).unwrap()).unwrap();
        let binary = Automaton::from_binary(&fs::read(out.join(BINARY_FILE_NAME)).unwrap()).unwrap();
        assert_eq!(json, binary);
        assert_eq!(json.stats().expression_count, 2);
    }

    #[test]
    fn test_compile_orders_homonyms_by_length_then_file_order() {
        let dir = TempDir::new().unwrap();
        let input = write_entries(
            &dir,
            r#"[{"id": "b", "korean": "김"}, {"id": "long", "korean": "김치찌개"}, {"id": "a", "korean": "김"}]"#,
        );
        let out = dir.path().to_path_buf();

        args(input, out.clone(), Some(CompileFormat::Json))
            .execute(&CliConfig::default())
            .unwrap();

        let automaton =
            Automaton::from_json(&fs::read(out.join(JSON_FILE_NAME)).unwrap()).unwrap();
        let spans = automaton.scan("김 한 장", None);
        assert_eq!(spans[0].ids.as_slice(), ["b", "a"]);
        assert!(!out.join(BINARY_FILE_NAME).exists());
    }

    #[test]
    fn test_compile_rejects_invalid_entries() {
        let dir = TempDir::new().unwrap();
        let input = write_entries(
            &dir,
            r#"[{"id": "a", "korean": "가"}, {"id": "a", "korean": "나"}]"#,
        );

        let error = args(input, dir.path().join("out"), None)
            .execute(&CliConfig::default())
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Entry validation failed with 1 problem(s)"
        );
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_saving_percent() {
        assert_eq!(saving_percent(0, 10), 0.0);
        assert!((saving_percent(1000, 170) - 83.0).abs() < 1e-9);
    }
}
