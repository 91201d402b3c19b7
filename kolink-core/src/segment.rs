//! Splitting scanned text into plain and linked pieces

use serde::Serialize;

use crate::matcher::MatchSpan;

/// One piece of a scanned text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment<'a> {
    /// Text with no link
    Plain {
        /// The text
        text: &'a str,
    },
    /// Text covered by a match
    Link {
        /// The matched text
        text: &'a str,
        /// Identifiers the text links to
        ids: &'a [String],
    },
}

impl<'a> Segment<'a> {
    /// The text of this piece
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain { text } | Segment::Link { text, .. } => text,
        }
    }
}

/// Cut `text` into consecutive plain and linked segments
///
/// `spans` must come from scanning this same `text`. Spans out of order,
/// overlapping an earlier span, or past the end of the text are skipped.
/// Concatenating the segment texts always gives back `text`.
pub fn split_segments<'a>(text: &'a str, spans: &'a [MatchSpan]) -> Vec<Segment<'a>> {
    // Byte offset of every character boundary, end of text included
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = offsets.len() - 1;

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for span in spans {
        if span.start < cursor || span.start >= span.end || span.end > char_count {
            continue;
        }
        if span.start > cursor {
            segments.push(Segment::Plain {
                text: &text[offsets[cursor]..offsets[span.start]],
            });
        }
        segments.push(Segment::Link {
            text: &text[offsets[span.start]..offsets[span.end]],
            ids: &span.ids,
        });
        cursor = span.end;
    }

    if cursor < char_count {
        segments.push(Segment::Plain {
            text: &text[offsets[cursor]..],
        });
    }

    segments
}
