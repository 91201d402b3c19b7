//! Dictionary entry files
//!
//! Each file holds either one entry object or an array of them. Only `id`
//! and `korean` are read; any other field is ignored.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::FileReader;

/// Entry as it appears on disk, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    /// Identifier
    pub id: Option<String>,
    /// Korean expression
    pub korean: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryDocument {
    Many(Vec<RawEntry>),
    One(RawEntry),
}

/// Position of an entry in the input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File the entry came from
    pub source: PathBuf,
    /// Zero-based position inside the file
    pub index: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.source.display(), self.index)
    }
}

/// Validated entry ready for compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Identifier
    pub id: String,
    /// Korean expression
    pub korean: String,
}

/// Everything read from a set of entry files
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Entries in file order
    pub entries: Vec<(Location, RawEntry)>,
    /// Files that could not be read or parsed
    pub failures: Vec<(PathBuf, String)>,
}

/// Read every file, collecting unreadable ones instead of stopping
pub fn load_entry_files(paths: &[PathBuf]) -> LoadReport {
    let mut report = LoadReport::default();

    for path in paths {
        match read_entry_file(path) {
            Ok(entries) => {
                log::info!("Loaded {} ({} entries)", path.display(), entries.len());
                report
                    .entries
                    .extend(entries.into_iter().enumerate().map(|(index, entry)| {
                        let location = Location {
                            source: path.clone(),
                            index,
                        };
                        (location, entry)
                    }));
            }
            Err(error) => {
                log::error!("Failed to load {}: {error:#}", path.display());
                report.failures.push((path.clone(), format!("{error:#}")));
            }
        }
    }

    report
}

fn read_entry_file(path: &Path) -> Result<Vec<RawEntry>> {
    let content = FileReader::read_text(path)?;
    let document: EntryDocument = serde_json::from_str(&content)
        .with_context(|| format!("Invalid entry JSON in {}", path.display()))?;
    Ok(match document {
        EntryDocument::Many(entries) => entries,
        EntryDocument::One(entry) => vec![entry],
    })
}

/// A reason an entry set cannot be compiled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryProblem {
    /// The file could not be read or parsed
    Unreadable {
        /// File path
        source: PathBuf,
        /// Error description
        reason: String,
    },
    /// A required field is absent
    MissingField {
        /// Where the entry is
        location: Location,
        /// Field name
        field: &'static str,
    },
    /// A required field is present but empty
    EmptyField {
        /// Where the entry is
        location: Location,
        /// Field name
        field: &'static str,
    },
    /// Two entries share an identifier
    DuplicateId {
        /// The shared identifier
        id: String,
        /// Where it was first seen
        first: Location,
        /// The repeated occurrence
        duplicate: Location,
    },
}

impl fmt::Display for EntryProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryProblem::Unreadable { source, reason } => {
                write!(f, "Unreadable file {}: {reason}", source.display())
            }
            EntryProblem::MissingField { location, field } => {
                write!(f, "[{location}] Missing required field: {field}")
            }
            EntryProblem::EmptyField { location, field } => {
                write!(f, "[{location}] Empty required field: {field}")
            }
            EntryProblem::DuplicateId {
                id,
                first,
                duplicate,
            } => write!(f, "Duplicate ID: {id} ({duplicate}, first seen at {first})"),
        }
    }
}

/// Check the whole report, returning every problem found
pub fn validate(report: &LoadReport) -> std::result::Result<Vec<Entry>, Vec<EntryProblem>> {
    let mut problems: Vec<EntryProblem> = report
        .failures
        .iter()
        .map(|(source, reason)| EntryProblem::Unreadable {
            source: source.clone(),
            reason: reason.clone(),
        })
        .collect();

    let mut seen: HashMap<&str, &Location> = HashMap::new();
    let mut entries = Vec::with_capacity(report.entries.len());

    for (location, raw) in &report.entries {
        let id = required(raw.id.as_deref(), "id", location, &mut problems);
        let korean = required(raw.korean.as_deref(), "korean", location, &mut problems);

        if let Some(id) = id {
            if let Some(first) = seen.insert(id, location) {
                problems.push(EntryProblem::DuplicateId {
                    id: id.to_string(),
                    first: first.clone(),
                    duplicate: location.clone(),
                });
                // Keep pointing at the first occurrence
                seen.insert(id, first);
            }
        }

        if let (Some(id), Some(korean)) = (id, korean) {
            entries.push(Entry {
                id: id.to_string(),
                korean: korean.to_string(),
            });
        }
    }

    if problems.is_empty() {
        Ok(entries)
    } else {
        Err(problems)
    }
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
    location: &Location,
    problems: &mut Vec<EntryProblem>,
) -> Option<&'a str> {
    match value {
        None => {
            problems.push(EntryProblem::MissingField {
                location: location.clone(),
                field,
            });
            None
        }
        Some("") => {
            problems.push(EntryProblem::EmptyField {
                location: location.clone(),
                field,
            });
            None
        }
        Some(value) => Some(value),
    }
}

/// Stable sort, longest expression first
///
/// Homonyms then list their identifiers in file order within each length.
pub fn order_by_length(entries: &mut [Entry]) {
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.korean.chars().count()));
}
