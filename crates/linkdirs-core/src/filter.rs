//! Ignore-pattern classification and matching
//!
//! Ignore patterns fall into three classes:
//! - **exact** names (`CVS`, `.git`) are checked with a set lookup,
//! - **glob** names (`*.swp`, `ignore-me?`) are shell patterns matched
//!   against a bare entry name,
//! - **full-path** patterns (`ignore/subdir`) contain a path separator and
//!   are matched against the walked path instead of the bare name.
//!
//! Shell patterns follow `fnmatch` rules: `*` and `?` also match `/`.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, is_separator};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use thiserror::Error;

/// Characters that turn a bare name into a shell pattern
const GLOB_CHARS: [char; 4] = ['*', '?', '[', '{'];

/// An ignore pattern that could not be compiled
#[derive(Debug, Error)]
pub enum PatternError {
    /// A single pattern is malformed
    #[error("Invalid ignore pattern: '{pattern}'")]
    Invalid {
        /// The pattern as written by the user
        pattern: String,
        /// Underlying glob error
        #[source]
        source: globset::Error,
    },
    /// The compiled set could not be assembled
    #[error("Failed to build ignore pattern set")]
    Build(#[source] globset::Error),
}

/// Ignore patterns split into exact names, name globs and full-path globs
#[derive(Clone)]
pub struct IgnorePatterns {
    exact: HashSet<OsString>,
    glob_patterns: Vec<String>,
    globs: GlobSet,
    full_path_patterns: Vec<String>,
    full_paths: GlobSet,
}

/// Check if a pattern contains a path separator
#[must_use]
pub fn is_full_path_pattern(pattern: &str) -> bool {
    pattern.chars().any(is_separator)
}

/// Check if a pattern contains shell wildcard characters
#[must_use]
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.chars().any(|c| GLOB_CHARS.contains(&c))
}

/// Classify patterns into exact names, name globs and full-path globs
///
/// A pattern with a path separator is a full-path pattern even if it also
/// contains wildcards.
///
/// # Errors
///
/// Returns an error if any glob or full-path pattern is malformed.
pub fn bucket_ignore_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<IgnorePatterns, PatternError> {
    let mut exact = HashSet::new();
    let mut glob_patterns = Vec::new();
    let mut full_path_patterns = Vec::new();

    for pattern in patterns.iter().map(|p| p.as_ref()) {
        if is_full_path_pattern(pattern) {
            full_path_patterns.push(pattern.to_string());
        } else if is_glob_pattern(pattern) {
            glob_patterns.push(pattern.to_string());
        } else {
            exact.insert(OsString::from(pattern));
        }
    }

    let globs = build_globset(glob_patterns.iter().map(String::as_str))?;

    // A pattern written relative to one root must also match when the entry
    // sits below any ancestor, and everything below a matching directory.
    let expanded = full_path_patterns
        .iter()
        .flat_map(|p| [p.clone(), format!("*/{p}"), format!("*/{p}/*")])
        .collect::<Vec<_>>();
    let full_paths = build_globset(expanded.iter().map(String::as_str))?;

    Ok(IgnorePatterns {
        exact,
        glob_patterns,
        globs,
        full_path_patterns,
        full_paths,
    })
}

fn build_globset<'a>(patterns: impl Iterator<Item = &'a str>) -> Result<GlobSet, PatternError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|source| PatternError::Invalid {
                pattern: pattern.to_string(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(PatternError::Build)
}

impl IgnorePatterns {
    /// Patterns that ignore nothing
    #[must_use]
    pub fn empty() -> Self {
        Self {
            exact: HashSet::new(),
            glob_patterns: Vec::new(),
            globs: GlobSet::empty(),
            full_path_patterns: Vec::new(),
            full_paths: GlobSet::empty(),
        }
    }

    /// Check if a bare entry name is ignored by an exact or glob pattern
    #[must_use]
    pub fn is_ignored_name(&self, name: &OsStr) -> bool {
        self.exact.contains(name) || self.globs.is_match(name)
    }

    /// Check if a walked path is ignored by a full-path pattern
    #[must_use]
    pub fn is_ignored_path(&self, path: &Path) -> bool {
        self.full_paths.is_match(path)
    }

    /// Drop names matching an exact or glob pattern, keeping the order of the rest
    #[must_use]
    pub fn filter_names<T: AsRef<OsStr>>(&self, names: Vec<T>) -> Vec<T> {
        names
            .into_iter()
            .filter(|name| !self.is_ignored_name(name.as_ref()))
            .collect()
    }

    /// Drop paths matching a full-path pattern, keeping the order of the rest
    #[must_use]
    pub fn filter_full_paths<T: AsRef<Path>>(&self, paths: Vec<T>) -> Vec<T> {
        paths
            .into_iter()
            .filter(|path| !self.is_ignored_path(path.as_ref()))
            .collect()
    }

    /// Exact names, sorted
    #[must_use]
    pub fn exact_names(&self) -> Vec<&OsStr> {
        let mut names: Vec<&OsStr> = self.exact.iter().map(OsString::as_os_str).collect();
        names.sort();
        names
    }

    /// Name globs in the order they were given
    #[must_use]
    pub fn glob_patterns(&self) -> &[String] {
        &self.glob_patterns
    }

    /// Full-path patterns in the order they were given, before expansion
    #[must_use]
    pub fn full_path_patterns(&self) -> &[String] {
        &self.full_path_patterns
    }
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for IgnorePatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnorePatterns")
            .field("exact", &self.exact_names())
            .field("globs", &self.glob_patterns)
            .field("full_paths", &self.full_path_patterns)
            .finish()
    }
}
