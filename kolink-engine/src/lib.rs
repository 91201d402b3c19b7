//! Automaton loading and linking for Kolink
//!
//! This crate turns a serialized automaton into a shared, lazily loaded
//! resource. The [`AutomatonCache`] fetches its source at most once, even
//! under concurrent demand, and falls back to an empty automaton when the
//! load fails so that text simply renders without links.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod linker;
pub mod source;

pub use cache::{AutomatonCache, CacheStatus};
pub use config::{FormatHint, LoaderConfig};
pub use error::{LoadError, Result};
pub use linker::{load_then_scan, Linker};
pub use source::{AutomatonSource, FileSource, MemorySource};

// Re-export from core for convenience
pub use kolink_core::{Automaton, MatchSpan};
