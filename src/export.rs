//! Manual export: turn the current document into a `<title>.txt` artifact.

use std::path::{Path, PathBuf};

use crate::protocol::DEFAULT_TITLE;
use crate::store::{self, StoreError, TextEncoding};

/// Characters that are path separators or reserved by some filesystem.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Reduces a document title to a safe bare filename: reserved and control
/// characters are stripped, surrounding whitespace trimmed, and an empty
/// result falls back to the default title.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|ch| !RESERVED.contains(ch) && !ch.is_control())
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Artifact path for a title inside `dir`. Titles that already carry the
/// `.txt` extension (server titles keep their full filename) are not
/// doubled up.
pub fn export_path(dir: &Path, title: &str) -> PathBuf {
    let name = sanitize_title(title);
    if name.to_ascii_lowercase().ends_with(".txt") {
        dir.join(name)
    } else {
        dir.join(format!("{name}.txt"))
    }
}

/// Writes the document to `dir` under its sanitized title and returns the
/// path written.
pub fn export(
    dir: &Path,
    title: &str,
    content: &str,
    encoding: TextEncoding,
) -> Result<PathBuf, StoreError> {
    let path = export_path(dir, title);
    store::write_string(&path, content, encoding)?;
    Ok(path)
}
