//! Text output formatter

use super::{OutputFormatter, ScannedDocument};
use anyhow::Result;
use std::io::Write;

/// Text formatter - outputs one tab-separated line per match
///
/// `name:start-end<TAB>expression<TAB>id,id`
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_document(&mut self, document: &ScannedDocument) -> Result<()> {
        for span in &document.spans {
            writeln!(
                self.writer,
                "{}:{}-{}\t{}\t{}",
                document.name,
                span.start,
                span.end,
                span.expression,
                span.ids.join(",")
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolink_core::build;

    #[test]
    fn test_text_lines() {
        let automaton = build([("asia", "아시아"), ("e", "에")]).unwrap();
        let text = "아시아에 가다".to_string();
        let document = ScannedDocument {
            name: "a.txt".to_string(),
            spans: automaton.scan(&text, None),
            text,
        };

        let mut buffer = Vec::new();
        let mut formatter = TextFormatter::new(&mut buffer);
        formatter.format_document(&document).unwrap();
        formatter.finish().unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "a.txt:0-3\t아시아\tasia\na.txt:3-4\t에\te\n");
    }
}
