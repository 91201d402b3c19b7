//! Loader configuration

use std::path::PathBuf;

use kolink_core::{codec, Automaton, CodecError, WireFormat};
use serde::{Deserialize, Serialize};

use crate::source::FileSource;

/// How a loaded payload should be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatHint {
    /// Detect from the first bytes
    #[default]
    Auto,
    /// Always JSON
    Json,
    /// Always binary
    Binary,
}

impl FormatHint {
    /// Decode `bytes` according to this hint
    pub fn decode(self, bytes: &[u8]) -> Result<Automaton, CodecError> {
        match self {
            FormatHint::Auto => codec::decode_auto(bytes),
            FormatHint::Json => codec::decode(bytes, WireFormat::Json),
            FormatHint::Binary => codec::decode(bytes, WireFormat::Binary),
        }
    }
}

impl From<WireFormat> for FormatHint {
    fn from(format: WireFormat) -> Self {
        match format {
            WireFormat::Json => FormatHint::Json,
            WireFormat::Binary => FormatHint::Binary,
        }
    }
}

/// Where the automaton lives and how to read it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Serialized automaton file
    pub path: PathBuf,
    /// Decoding hint
    pub format: FormatHint,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/expression-trie.json"),
            format: FormatHint::Auto,
        }
    }
}

impl LoaderConfig {
    /// Configuration for a specific file, format detected
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: FormatHint::Auto,
        }
    }

    /// File source for the configured path
    pub fn source(&self) -> FileSource {
        FileSource::new(&self.path)
    }
}
