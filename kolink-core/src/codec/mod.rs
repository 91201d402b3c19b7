//! Serialized forms of the automaton
//!
//! Two interchangeable encodings exist:
//!
//! - **JSON**: an array of `{children, output, korean, fail}` objects, one per
//!   node, children keyed by a one-character string.
//! - **Binary**: a little-endian node table backed by a deduplicated string
//!   table, considerably smaller than the JSON form.
//!
//! Decoding either form validates the full trie structure before returning.

mod binary;
mod json;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::automaton::Automaton;
use crate::error::Result;

/// Encoding of a serialized automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Array of node objects
    Json,
    /// Little-endian node table with a string table
    Binary,
}

impl WireFormat {
    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            WireFormat::Json => "json",
            WireFormat::Binary => "bin",
        }
    }

    /// Guess the format of a payload
    ///
    /// A JSON automaton always starts with `[` once leading whitespace is
    /// skipped. A binary payload starts with the node count, whose low byte
    /// would have to be 0x5B for the same check to misfire.
    pub fn detect(bytes: &[u8]) -> WireFormat {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'[') => WireFormat::Json,
            _ => WireFormat::Binary,
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Json => write!(f, "json"),
            WireFormat::Binary => write!(f, "binary"),
        }
    }
}

impl FromStr for WireFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(WireFormat::Json),
            "binary" | "bin" => Ok(WireFormat::Binary),
            other => Err(format!("unknown wire format '{other}'")),
        }
    }
}

/// Serialize `automaton` in the given format
pub fn encode(automaton: &Automaton, format: WireFormat) -> Result<Vec<u8>> {
    match format {
        WireFormat::Json => json::encode(automaton, false),
        WireFormat::Binary => binary::encode(automaton),
    }
}

/// Deserialize and validate an automaton in the given format
pub fn decode(bytes: &[u8], format: WireFormat) -> Result<Automaton> {
    match format {
        WireFormat::Json => json::decode(bytes),
        WireFormat::Binary => binary::decode(bytes),
    }
}

/// Deserialize an automaton whose format is detected from its first bytes
pub fn decode_auto(bytes: &[u8]) -> Result<Automaton> {
    decode(bytes, WireFormat::detect(bytes))
}

impl Automaton {
    /// Compact JSON form
    pub fn to_json(&self) -> Result<Vec<u8>> {
        json::encode(self, false)
    }

    /// Indented JSON form
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        json::encode(self, true)
    }

    /// Decode and validate the JSON form
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        json::decode(bytes)
    }

    /// Binary form
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        binary::encode(self)
    }

    /// Decode and validate the binary form
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        binary::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;

    #[test]
    fn test_detect_format() {
        assert_eq!(WireFormat::detect(b"[{}]"), WireFormat::Json);
        assert_eq!(WireFormat::detect(b" \n\t[]"), WireFormat::Json);
        assert_eq!(WireFormat::detect(&[3, 0, 0, 0]), WireFormat::Binary);
        assert_eq!(WireFormat::detect(b""), WireFormat::Binary);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<WireFormat>(), Ok(WireFormat::Json));
        assert_eq!("bin".parse::<WireFormat>(), Ok(WireFormat::Binary));
        assert!("yaml".parse::<WireFormat>().is_err());
    }

    #[test]
    fn test_decode_auto_handles_both_formats() {
        let automaton = build([("id1", "안녕"), ("id2", "안녕하세요")]).unwrap();
        for format in [WireFormat::Json, WireFormat::Binary] {
            let bytes = encode(&automaton, format).unwrap();
            assert_eq!(decode_auto(&bytes).unwrap(), automaton, "format {format}");
        }
    }

    #[test]
    fn test_binary_is_smaller_than_json() {
        let automaton = build([
            ("a", "아시아"),
            ("b", "아시아나"),
            ("c", "시아"),
            ("d", "대한민국"),
            ("e", "한국어"),
        ])
        .unwrap();
        let json = automaton.to_json().unwrap();
        let binary = automaton.to_binary().unwrap();
        assert!(binary.len() < json.len());
    }
}
