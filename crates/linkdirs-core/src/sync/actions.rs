//! Sync action determination logic
//!
//! Resolvers only read the filesystem; they never change it.

use std::fs::{self, Metadata};
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use anyhow::Context;

use crate::config::Options;
use crate::error::Result;
use crate::links::{lstat_if_exists, same_contents};

/// Permission bits as reported by `S_IMODE`
const MODE_MASK: u32 = 0o7777;

/// Action to take for a source subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirAction {
    /// Destination directory exists with the source's permissions
    UpToDate,
    /// Destination directory exists with different permissions
    SetMode {
        /// Source permission bits
        mode: u32,
    },
    /// Nothing exists at the destination
    Create {
        /// Source permission bits
        mode: u32,
    },
    /// A non-directory is in the way and will be removed first (`--force`)
    Replace {
        /// Source permission bits
        mode: u32,
    },
    /// A non-directory is in the way; the subtree is left alone
    NotADirectory,
}

impl DirAction {
    /// Determine what to do with `dest_dir` so it mirrors `source_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if either path cannot be stat'ed.
    pub fn resolve(source_dir: &Path, dest_dir: &Path, force: bool) -> Result<Self> {
        let mode = permission_bits(source_dir)?;

        let Some(dest) = lstat_if_exists(dest_dir)? else {
            return Ok(Self::Create { mode });
        };

        if dest.file_type().is_dir() {
            if dest.permissions().mode() & MODE_MASK == mode {
                Ok(Self::UpToDate)
            } else {
                Ok(Self::SetMode { mode })
            }
        } else if force {
            Ok(Self::Replace { mode })
        } else {
            Ok(Self::NotADirectory)
        }
    }

    /// Action for a source subdirectory whose destination parent is being
    /// created, so the destination is known not to exist
    ///
    /// # Errors
    ///
    /// Returns an error if `source_dir` cannot be stat'ed.
    pub fn resolve_in_new_parent(source_dir: &Path) -> Result<Self> {
        Ok(Self::Create {
            mode: permission_bits(source_dir)?,
        })
    }

    /// Whether the walk should continue below this directory
    #[must_use]
    pub const fn descends(&self) -> bool {
        !matches!(self, Self::NotADirectory)
    }

    /// Whether the destination directory starts out empty
    #[must_use]
    pub const fn creates(&self) -> bool {
        matches!(self, Self::Create { .. } | Self::Replace { .. })
    }
}

/// Action to take for a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Source is a symlink and symlinks are ignored
    SkipSymlink,
    /// Source is a symlink; symlinks are never synced
    RejectSymlink,
    /// Destination does not exist
    Link,
    /// Destination is removed and relinked (`--force`)
    Replace,
    /// Destination is a symlink, directory or other non-regular file
    NotAFile,
    /// Destination already is the source file
    AlreadyLinked,
    /// Destination has other hardlinks and might belong to another source
    SharedLink {
        /// Hardlink count of the destination
        count: u64,
    },
    /// Destination is a separate file with identical contents
    SelfHeal,
    /// Destination contents differ; only a diff is reported
    Diff,
}

impl FileAction {
    /// Determine what to do with `dest` so it becomes a hardlink to `source`
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be stat'ed or read.
    pub fn resolve(source: &Path, dest: &Path, options: &Options) -> Result<Self> {
        let source_meta = lstat_source(source)?;
        if let Some(action) = Self::for_symlink(&source_meta, options) {
            return Ok(action);
        }

        // A dangling symlink still exists as far as lstat is concerned.
        let Some(dest_meta) = lstat_if_exists(dest)? else {
            return Ok(Self::Link);
        };

        if !dest_meta.file_type().is_file() {
            return Ok(if options.force { Self::Replace } else { Self::NotAFile });
        }

        if source_meta.dev() == dest_meta.dev() && source_meta.ino() == dest_meta.ino() {
            return Ok(Self::AlreadyLinked);
        }

        if options.force {
            return Ok(Self::Replace);
        }

        let count = dest_meta.nlink();
        if count != 1 {
            return Ok(Self::SharedLink { count });
        }

        if same_contents(source, dest)? {
            Ok(Self::SelfHeal)
        } else {
            Ok(Self::Diff)
        }
    }

    /// Action for a source file whose destination directory is being created
    ///
    /// Under dry-run that directory may still be a symlink to somewhere else,
    /// so the destination is not looked at.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` cannot be stat'ed.
    pub fn resolve_in_new_parent(source: &Path, options: &Options) -> Result<Self> {
        let source_meta = lstat_source(source)?;
        Ok(Self::for_symlink(&source_meta, options).unwrap_or(Self::Link))
    }

    fn for_symlink(source_meta: &Metadata, options: &Options) -> Option<Self> {
        if !source_meta.file_type().is_symlink() {
            return None;
        }
        Some(if options.ignore_symlinks {
            Self::SkipSymlink
        } else {
            Self::RejectSymlink
        })
    }
}

fn lstat_source(source: &Path) -> Result<Metadata> {
    fs::symlink_metadata(source).with_context(|| format!("Failed to stat {}", source.display()))
}

fn permission_bits(path: &Path) -> Result<u32> {
    let metadata =
        fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
    Ok(metadata.permissions().mode() & MODE_MASK)
}
