//! Reading inputs and writing compiled automata

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Byte order mark some editors put at the start of UTF-8 files
const UTF8_BOM: char = '\u{FEFF}';

/// Text and artifact file access for the CLI
pub struct FileReader;

impl FileReader {
    /// Read a UTF-8 document, dropping a leading byte order mark
    ///
    /// Match offsets count code points from the first visible character.
    pub fn read_text(path: &Path) -> Result<String> {
        let mut text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {} as UTF-8 text", path.display()))?;
        if text.starts_with(UTF8_BOM) {
            text.replace_range(..UTF8_BOM.len_utf8(), "");
        }
        Ok(text)
    }

    /// Write a compiled artifact, creating its directory first
    pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create directory {}", dir.display()))?;
        }
        fs::write(path, bytes).with_context(|| format!("Cannot write {}", path.display()))
    }
}
