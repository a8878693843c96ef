//! # linkdirs-core
//!
//! Core library for the `linkdirs` tool.
//!
//! Mirrors one or more source directory trees into a destination tree by
//! creating hardlinks, reports files whose contents differ, and optionally
//! reports or deletes destination entries that no source accounts for.
//!
//! The library never decides how a run ends: it returns a list of messages,
//! and the caller treats an empty list as success.

#![warn(missing_docs)]

#[cfg(not(unix))]
compile_error!("linkdirs relies on Unix hardlink counts, inode numbers and permission bits");

/// Core error types for the linkdirs library
pub mod error {
    /// Result type alias using `anyhow::Error`
    pub type Result<T> = anyhow::Result<T>;

    pub use crate::filter::PatternError;
}

/// Options, configuration files and ignore files
pub mod config;

/// Ignore-pattern classification and matching
pub mod filter;

/// Dry-run aware filesystem primitives
pub mod links;

/// Top-level orchestration of a whole run
pub mod run;

/// Hardlink synchronization of one source tree
pub mod sync;

/// Detection, deletion and formatting of destination-only entries
pub mod unexpected;

pub use config::{DEFAULT_IGNORE_PATTERNS, Options};
pub use filter::{IgnorePatterns, bucket_ignore_patterns};
pub use run::link_directories;
pub use sync::{LinkResults, SyncEngine};
pub use unexpected::{UnexpectedPaths, report_unexpected_files};
