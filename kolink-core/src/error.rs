//! Core error types
//!
//! Building and decoding are the only fallible operations in this crate.
//! Scanning is total and has no error type.

use thiserror::Error;

/// Errors raised while compiling patterns into an automaton
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A pattern had an empty expression
    #[error("empty expression for identifier '{identifier}' (pattern #{position})")]
    EmptyExpression {
        /// Identifier of the offending pattern
        identifier: String,
        /// Zero-based position of the pattern in the input sequence
        position: usize,
    },
}

/// Errors raised while encoding or decoding a serialized automaton
#[derive(Error, Debug)]
pub enum CodecError {
    /// Malformed JSON payload
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the binary payload failed, usually because it was truncated
    #[error("binary payload I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A string in the binary string table is not valid UTF-8
    #[error("invalid UTF-8 in string table entry {index}")]
    InvalidUtf8 {
        /// Index of the string table entry
        index: usize,
    },

    /// A string referenced by index does not exist in the string table
    #[error("string index {index} out of range ({len} strings)")]
    StringIndexOutOfRange {
        /// Referenced index
        index: u32,
        /// Size of the string table
        len: usize,
    },

    /// A string is too long for the binary string table
    #[error("string of {len} bytes exceeds the binary table limit of {max} bytes")]
    StringTooLong {
        /// Length of the string in bytes
        len: usize,
        /// Largest encodable length
        max: usize,
    },

    /// A table is too large for its binary count field
    #[error("{what} count {count} exceeds the binary format limit")]
    CountOverflow {
        /// Which table overflowed
        what: &'static str,
        /// Actual count
        count: usize,
    },

    /// A child key is not exactly one character
    #[error("child key {key:?} of node {node} is not a single character")]
    InvalidChildKey {
        /// Node holding the child map
        node: usize,
        /// Offending key
        key: String,
    },

    /// Bytes remained after the last node
    #[error("{0} trailing bytes after the last node")]
    TrailingBytes(usize),

    /// The decoded nodes violate a structural invariant of the trie
    #[error("invalid automaton: {0}")]
    Invariant(String),
}

impl CodecError {
    pub(crate) fn invariant<S: Into<String>>(msg: S) -> Self {
        CodecError::Invariant(msg.into())
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
