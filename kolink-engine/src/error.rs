//! Loading errors
//!
//! None of these reach scan callers: the cache logs them and degrades to an
//! empty automaton.

use std::path::PathBuf;

use kolink_core::CodecError;
use thiserror::Error;

/// Failure to obtain an automaton from its source
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the serialized automaton failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The payload could not be decoded
    #[error("failed to decode automaton: {0}")]
    Decode(#[from] CodecError),

    /// A custom source reported a failure
    #[error("source unavailable: {0}")]
    Source(String),
}

/// Result type for loading operations
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let error = LoadError::Io {
            path: PathBuf::from("data/trie.bin"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(error.to_string(), "failed to read data/trie.bin: missing");
    }

    #[test]
    fn test_decode_error_wraps_codec_error() {
        let error = LoadError::from(CodecError::TrailingBytes(4));
        assert_eq!(
            error.to_string(),
            "failed to decode automaton: 4 trailing bytes after the last node"
        );
    }
}
