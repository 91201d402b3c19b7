//! Input handling module

pub mod entries;
pub mod file_reader;
pub mod glob_resolver;

pub use entries::{load_entry_files, order_by_length, validate, Entry, EntryProblem, LoadReport};
pub use file_reader::FileReader;
pub use glob_resolver::resolve_patterns;
