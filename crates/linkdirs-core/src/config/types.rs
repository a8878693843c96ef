//! Configuration types and structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::filter::IgnorePatterns;

/// Patterns that are always ignored; user patterns are appended
pub const DEFAULT_IGNORE_PATTERNS: [&str; 7] = [
    "CVS",
    ".git",
    ".gitignore",
    ".gitmodules",
    ".hg",
    ".svn",
    "*.swp",
];

/// Settings for one run, fixed before any filesystem work starts
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Print shell commands instead of changing the filesystem
    pub dryrun: bool,
    /// Remove conflicting destination entries
    pub force: bool,
    /// Skip source symlinks without reporting them
    pub ignore_symlinks: bool,
    /// Skip unexpected top-level destination directories
    pub ignore_unexpected_children: bool,
    /// Report destination entries that no source accounts for
    pub report_unexpected_files: bool,
    /// Delete destination entries that no source accounts for
    pub delete_unexpected_files: bool,
    /// Names and paths skipped in both walks
    pub ignore: IgnorePatterns,
}

impl Options {
    /// Whether the unexpected-file pass runs at all
    #[must_use]
    pub const fn checks_unexpected_files(&self) -> bool {
        self.report_unexpected_files || self.delete_unexpected_files
    }
}

/// Configuration file contents
///
/// Only non-destructive settings can be set here; `dryrun`, `force` and
/// `delete_unexpected_files` are command-line only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Extra ignore patterns
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Files containing ignore patterns, one per line
    #[serde(default)]
    pub ignore_files: Vec<PathBuf>,

    /// Skip source symlinks without reporting them
    #[serde(default)]
    pub ignore_symlinks: bool,

    /// Skip unexpected top-level destination directories
    #[serde(default)]
    pub ignore_unexpected_children: bool,

    /// Report destination entries that no source accounts for
    #[serde(default)]
    pub report_unexpected_files: bool,
}
