//! Unified diffs between a destination file and its source

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};
use similar::{ChangeTag, TextDiff};

use crate::error::Result;

const DIFF_CONTEXT_LINES: usize = 3;

/// `ctime(3)` layout, e.g. `Thu Oct 17 09:05:01 2026`
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Diff `dest` against `source` as a list of unified-diff lines
///
/// The destination is the old side and the source the new side, so the diff
/// shows what linking would change in the destination. Header lines carry
/// each file's modification time; lines have no trailing newline. Identical
/// files produce an empty list.
///
/// # Errors
///
/// Returns an error if either file cannot be read or stat'ed.
pub fn diff(source: &Path, dest: &Path) -> Result<Vec<String>> {
    let (source_text, source_time) = read_with_mtime(source)?;
    let (dest_text, dest_time) = read_with_mtime(dest)?;

    let text_diff = TextDiff::from_lines(dest_text.as_str(), source_text.as_str());
    let mut unified = text_diff.unified_diff();
    unified.context_radius(DIFF_CONTEXT_LINES);

    let mut lines = Vec::new();
    for hunk in unified.iter_hunks() {
        if lines.is_empty() {
            lines.push(format!("--- {}\t{dest_time}", dest.display()));
            lines.push(format!("+++ {}\t{source_time}", source.display()));
        }
        lines.push(hunk.header().to_string());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
                ChangeTag::Equal => ' ',
            };
            lines.push(format!("{sign}{}", change.value().trim_end_matches('\n')));
        }
    }

    Ok(lines)
}

fn read_with_mtime(path: &Path) -> Result<(String, String)> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to get modification time for: {}", path.display()))?;
    let bytes = fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    let timestamp = DateTime::<Local>::from(modified).format(CTIME_FORMAT).to_string();
    Ok((String::from_utf8_lossy(&bytes).into_owned(), timestamp))
}
