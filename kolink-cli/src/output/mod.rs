//! Output formatting module

use anyhow::Result;
use kolink_core::MatchSpan;

/// One scanned input with its resolved spans
#[derive(Debug, Clone)]
pub struct ScannedDocument {
    /// File path or other label of the input
    pub name: String,
    /// Full input text
    pub text: String,
    /// Spans found in `text`
    pub spans: Vec<MatchSpan>,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output the matches of a single document
    fn format_document(&mut self, document: &ScannedDocument) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;
