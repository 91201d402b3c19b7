//! Markdown output formatter

use super::{OutputFormatter, ScannedDocument};
use anyhow::Result;
use kolink_core::{split_segments, Segment};
use std::io::Write;

/// Markdown formatter - renders each document with its matches as links
///
/// Homonyms link to their first identifier.
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    link_template: String,
    link_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter; `{id}` in `link_template` is replaced by the identifier
    pub fn new(writer: W, link_template: impl Into<String>) -> Self {
        Self {
            writer,
            link_template: link_template.into(),
            link_count: 0,
        }
    }

    fn render(&self, document: &ScannedDocument) -> String {
        split_segments(&document.text, &document.spans)
            .into_iter()
            .map(|segment| match segment {
                Segment::Plain { text } => escape_text(text),
                Segment::Link { text, ids } => match ids.first() {
                    Some(id) => format!("[{}]({})", escape_text(text), self.link_target(id)),
                    None => escape_text(text),
                },
            })
            .collect()
    }

    fn link_target(&self, id: &str) -> String {
        self.link_template.replace("{id}", &escape_target(id))
    }
}

/// Characters with inline meaning in CommonMark
const INLINE_METACHARACTERS: &[char] = &[
    '\\', '`', '*', '_', '[', ']', '(', ')', '<', '>', '#', '!', '|', '~',
];

/// Backslash-escape inline metacharacters so input text stays literal
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if INLINE_METACHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Percent-encode what would end or split a link destination
fn escape_target(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for ch in id.chars() {
        match ch {
            ' ' => escaped.push_str("%20"),
            '(' => escaped.push_str("%28"),
            ')' => escaped.push_str("%29"),
            '<' => escaped.push_str("%3C"),
            '>' => escaped.push_str("%3E"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_document(&mut self, document: &ScannedDocument) -> Result<()> {
        let rendered = self.render(document);
        self.link_count += document.spans.len();
        writeln!(self.writer, "## {}", document.name)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", rendered.trim_end())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total links: {}*", self.link_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
