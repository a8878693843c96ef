//! Ignore files: one shell pattern per line

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::error::Result;

/// Read ignore patterns from `path`
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_ignore_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ignore file: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
