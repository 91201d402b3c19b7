//! Configuration module

use std::path::Path;

use anyhow::{Context, Result};
use kolink_core::WireFormat;
use kolink_engine::LoaderConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Compilation configuration
    #[serde(default)]
    pub compile: CompileConfig,

    /// Automaton loading configuration
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl CliConfig {
    /// Load a TOML configuration file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&content).map_err(|e| {
            CliError::ConfigError(format!("{}: {}", path.display(), e.message()))
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Compilation-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CompileConfig {
    /// Order expressions longest first before building
    pub sort_by_length: bool,

    /// Formats written by `compile`
    pub formats: Vec<WireFormat>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            sort_by_length: true,
            formats: vec![WireFormat::Json, WireFormat::Binary],
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty print JSON output
    pub pretty_json: bool,

    /// Link target for markdown output; `{id}` is replaced by the identifier
    pub link_template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            link_template: "/entries/{id}".to_string(),
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl PerformanceConfig {
    /// Thread count to use, given an optional command-line override
    pub fn resolve_threads(&self, requested: Option<usize>) -> usize {
        match requested.unwrap_or(self.worker_threads) {
            0 => num_cpus::get(),
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolink_engine::FormatHint;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert!(config.compile.sort_by_length);
        assert_eq!(
            config.compile.formats,
            vec![WireFormat::Json, WireFormat::Binary]
        );
        assert!(config.output.pretty_json);
        assert_eq!(config.performance.worker_threads, 0);
    }

    #[test]
    fn test_no_path_gives_defaults() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[compile]
formats = ["binary"]

[loader]
path = "public/data/trie.bin"
format = "binary"
"#
        )
        .unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.compile.formats, vec![WireFormat::Binary]);
        assert!(config.compile.sort_by_length);
        assert_eq!(config.loader.format, FormatHint::Binary);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[compile]\nsort_by_length = \"maybe\"\n").unwrap();

        let error = CliConfig::load(Some(file.path())).unwrap_err();
        assert!(error.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_missing_file() {
        let error = CliConfig::load(Some(Path::new("/nonexistent/kolink.toml"))).unwrap_err();
        assert_eq!(error.to_string(), "File not found: /nonexistent/kolink.toml");
    }

    #[test]
    fn test_resolve_threads() {
        let config = PerformanceConfig { worker_threads: 3 };
        assert_eq!(config.resolve_threads(None), 3);
        assert_eq!(config.resolve_threads(Some(5)), 5);
        assert!(PerformanceConfig::default().resolve_threads(None) >= 1);
    }
}
