//! Dry-run aware filesystem primitives
//!
//! Every mutating primitive takes a `dryrun` flag. Under dry-run the
//! equivalent shell command is printed to stdout instead, with each path
//! quoted so the output can be pasted into a shell.

mod contents;
mod diff;
mod shell;

use std::fs::{self, Metadata};
use std::io::{self, ErrorKind};
use std::path::Path;

use anyhow::Context;
use tracing::debug;

pub use contents::same_contents;
pub use diff::diff;
pub use shell::{quote, quote_all};

use crate::error::Result;

/// Look up a path without following a final symlink
///
/// Returns `None` when nothing exists at `path`, including when one of its
/// ancestors is not a directory.
///
/// # Errors
///
/// Returns an error for any other lookup failure, such as permission denied.
pub fn lstat_if_exists(path: &Path) -> Result<Option<Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if is_missing(&e) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to stat {}", path.display())),
    }
}

fn is_missing(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

/// Remove a file, symlink or directory tree, or print the command that would
///
/// Symlinks and anything that is not a real directory are unlinked; real
/// directories are removed recursively. A path that disappears before it can
/// be unlinked counts as removed.
///
/// # Errors
///
/// Returns an error if removal fails for any reason other than the path
/// already being gone.
pub fn safe_unlink(unlink_me: &Path, dryrun: bool) -> Result<()> {
    let is_real_dir = lstat_if_exists(unlink_me)?.is_some_and(|m| m.file_type().is_dir());

    if !is_real_dir {
        if dryrun {
            println!("rm {}", quote(unlink_me));
            return Ok(());
        }
        debug!(path = %unlink_me.display(), "unlinking");
        return match fs::remove_file(unlink_me) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %unlink_me.display(), "already removed");
                Ok(())
            }
            other => other.with_context(|| format!("Failed to remove {}", unlink_me.display())),
        };
    }

    if dryrun {
        println!("rm -r {}", quote(unlink_me));
        return Ok(());
    }
    debug!(path = %unlink_me.display(), "removing directory tree");
    match fs::remove_dir_all(unlink_me) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other.with_context(|| format!("Failed to remove directory {}", unlink_me.display())),
    }
}

/// Hardlink `dest` to `source`, or print the command that would
///
/// Source and destination must be on the same filesystem; a cross-device
/// link fails with the OS error.
///
/// # Errors
///
/// Returns an error if the link cannot be created.
pub fn safe_link(source: &Path, dest: &Path, dryrun: bool) -> Result<()> {
    if dryrun {
        println!("ln {} {}", quote(source), quote(dest));
        return Ok(());
    }
    debug!(source = %source.display(), dest = %dest.display(), "linking");
    fs::hard_link(source, dest)
        .with_context(|| format!("Failed to link {} to {}", dest.display(), source.display()))
}
