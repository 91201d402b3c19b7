//! JSON output formatter

use super::{OutputFormatter, ScannedDocument};
use anyhow::Result;
use kolink_core::MatchSpan;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs documents and their matches as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    documents: Vec<DocumentData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentData {
    /// Input label
    pub source: String,
    /// Resolved matches, offsets in code points
    pub matches: Vec<MatchSpan>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            documents: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_document(&mut self, document: &ScannedDocument) -> Result<()> {
        self.documents.push(DocumentData {
            source: document.name.clone(),
            matches: document.spans.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.documents)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.documents)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
