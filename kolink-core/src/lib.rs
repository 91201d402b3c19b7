//! Kolink Core - Aho-Corasick matching of Korean expressions
//!
//! This crate builds an automaton from `(identifier, expression)` pairs and
//! scans free text for every indexed expression in a single pass. Results
//! are resolved into disjoint, longest-first spans so that each span can be
//! turned into exactly one link.
//!
//! # Architecture
//!
//! - **Builder**: inserts patterns into a character trie and computes fail
//!   links breadth-first
//! - **Matcher**: walks the automaton once over the text and reports
//!   candidate spans
//! - **Boundary**: drops one- and two-character matches embedded in a longer
//!   Hangul word
//! - **Overlap**: keeps the longest of overlapping candidates, online
//! - **Codec**: JSON and compact binary serialization of the automaton
//!
//! # Example
//!
//! ```rust
//! use kolink_core::{build, split_segments, Segment};
//!
//! let automaton = build([("asia", "아시아"), ("e", "에")]).unwrap();
//! let text = "아시아에 가다";
//! let spans = automaton.scan(text, None);
//! assert_eq!(spans.len(), 2);
//!
//! let segments = split_segments(text, &spans);
//! assert_eq!(segments.last(), Some(&Segment::Plain { text: " 가다" }));
//! ```

#![warn(missing_docs)]

pub mod automaton;
pub mod boundary;
pub mod builder;
pub mod codec;
pub mod error;
pub mod matcher;
pub mod overlap;
pub mod segment;

pub use automaton::{Automaton, AutomatonStats, Identifiers, NodeId, TrieNode, ROOT};
pub use boundary::{is_hangul, SHORT_MATCH_MAX_LEN};
pub use builder::{build, AutomatonBuilder};
pub use codec::{decode, decode_auto, encode, WireFormat};
pub use error::{BuildError, CodecError};
pub use matcher::{scan, MatchSpan};
pub use segment::{split_segments, Segment};
