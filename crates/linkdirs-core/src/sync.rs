//! Hardlink synchronization engine
//!
//! This module mirrors one source tree into a destination tree. For every
//! entry a read-only resolver picks an action (`DirAction` / `FileAction`)
//! and the executor carries it out, or prints the shell equivalent under
//! dry-run. Only the executor knows about dry-run, so both modes take the
//! same decisions.

mod actions;
mod executor;
mod orchestrator;


use std::collections::BTreeSet;
use std::path::PathBuf;

pub use actions::{DirAction, FileAction};
pub use executor::ActionExecutor;
pub use orchestrator::SyncEngine;

/// Results of linking files and directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkResults {
    /// Destination paths that should exist once every source entry is linked
    ///
    /// Entries that produced an error are still expected.
    pub expected_files: BTreeSet<PathBuf>,
    /// Diff lines between differing source and destination files
    pub diffs: Vec<String>,
    /// Error messages
    pub errors: Vec<String>,
}

impl LinkResults {
    /// Append `other` to `self`, keeping diffs and errors in order
    pub fn extend(&mut self, other: Self) {
        self.expected_files.extend(other.expected_files);
        self.diffs.extend(other.diffs);
        self.errors.extend(other.errors);
    }

    /// Whether nothing needs to be reported
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diffs.is_empty() && self.errors.is_empty()
    }

    /// Diffs followed by errors
    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        let mut messages = self.diffs;
        messages.extend(self.errors);
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_preserves_order_and_dedups_expected() {
        let mut results = LinkResults::default();
        results.expected_files.insert(PathBuf::from("/z/a"));
        results.errors.push("first".to_string());

        let mut other = LinkResults::default();
        other.expected_files.insert(PathBuf::from("/z/a"));
        other.expected_files.insert(PathBuf::from("/z/b"));
        other.diffs.push("-old".to_string());
        other.errors.push("second".to_string());

        results.extend(other);

        assert_eq!(results.expected_files.len(), 2);
        assert_eq!(results.errors, ["first", "second"]);
        assert_eq!(results.diffs, ["-old"]);
        assert!(!results.is_clean());
    }

    #[test]
    fn test_into_messages_puts_diffs_first() {
        let results = LinkResults {
            expected_files: BTreeSet::new(),
            diffs: vec!["--- b".to_string(), "+++ a".to_string()],
            errors: vec!["b/dir is not a directory".to_string()],
        };

        assert_eq!(
            results.into_messages(),
            ["--- b", "+++ a", "b/dir is not a directory"]
        );
    }

    #[test]
    fn test_default_is_clean() {
        assert!(LinkResults::default().is_clean());
    }
}
