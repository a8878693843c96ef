//! Carries out resolved sync actions

use std::fs::{self, DirBuilder, Permissions};
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::Path;

use anyhow::Context;
use tracing::{debug, warn};

use super::LinkResults;
use super::actions::{DirAction, FileAction};
use crate::error::Result;
use crate::links::{self, quote};

/// Executes sync actions, or prints them under dry-run
#[derive(Debug, Clone, Copy)]
pub struct ActionExecutor {
    dry_run: bool,
}

impl ActionExecutor {
    /// Create a new executor
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Execute an action for a destination directory
    ///
    /// # Errors
    ///
    /// Returns an error if a filesystem operation fails.
    pub fn execute_dir(
        &self,
        action: DirAction,
        dest_dir: &Path,
        results: &mut LinkResults,
    ) -> Result<()> {
        match action {
            DirAction::UpToDate => {}
            DirAction::SetMode { mode } => self.set_mode(dest_dir, mode)?,
            DirAction::Create { mode } => self.create_dir(dest_dir, mode)?,
            DirAction::Replace { mode } => {
                links::safe_unlink(dest_dir, self.dry_run)?;
                self.create_dir(dest_dir, mode)?;
            }
            DirAction::NotADirectory => {
                warn!(path = %dest_dir.display(), "destination is not a directory");
                results
                    .errors
                    .push(format!("{} is not a directory", dest_dir.display()));
            }
        }
        Ok(())
    }

    /// Execute an action for a destination file
    ///
    /// # Errors
    ///
    /// Returns an error if a filesystem operation fails.
    pub fn execute_file(
        &self,
        action: FileAction,
        source: &Path,
        dest: &Path,
        results: &mut LinkResults,
    ) -> Result<()> {
        match action {
            FileAction::SkipSymlink | FileAction::AlreadyLinked => {}
            FileAction::RejectSymlink => {
                results
                    .errors
                    .push(format!("Ignoring symbolic link {}", source.display()));
            }
            FileAction::Link => links::safe_link(source, dest, self.dry_run)?,
            FileAction::Replace => self.relink(source, dest)?,
            FileAction::NotAFile => {
                results
                    .errors
                    .push(format!("{}: is not a file", dest.display()));
            }
            FileAction::SharedLink { count } => {
                results.errors.push(format!(
                    "{}: link count is {count}; is this file present in multiple source directories?",
                    dest.display()
                ));
            }
            FileAction::SelfHeal => {
                println!(
                    "{} and {} are different files but have the same contents; deleting and linking",
                    source.display(),
                    dest.display()
                );
                self.relink(source, dest)?;
            }
            FileAction::Diff => {
                let lines = links::diff(source, dest)?;
                if lines.is_empty() {
                    // The difference was lost to lossy decoding.
                    results.diffs.push(format!(
                        "Binary files {} and {} differ",
                        dest.display(),
                        source.display()
                    ));
                } else {
                    results.diffs.extend(lines);
                }
            }
        }
        Ok(())
    }

    fn relink(&self, source: &Path, dest: &Path) -> Result<()> {
        links::safe_unlink(dest, self.dry_run)?;
        links::safe_link(source, dest, self.dry_run)
    }

    /// Create a directory with exactly `mode`, regardless of the umask
    fn create_dir(&self, dest_dir: &Path, mode: u32) -> Result<()> {
        if self.dry_run {
            println!("mkdir {}", quote(dest_dir));
            return Ok(());
        }
        debug!(path = %dest_dir.display(), mode = format_args!("{mode:o}"), "creating directory");
        DirBuilder::new()
            .mode(mode)
            .create(dest_dir)
            .with_context(|| format!("Failed to create directory: {}", dest_dir.display()))?;
        Self::chmod(dest_dir, mode)
    }

    fn set_mode(&self, dest_dir: &Path, mode: u32) -> Result<()> {
        if self.dry_run {
            println!("chmod 0{mode:o} {}", quote(dest_dir));
            return Ok(());
        }
        debug!(path = %dest_dir.display(), mode = format_args!("{mode:o}"), "changing mode");
        Self::chmod(dest_dir, mode)
    }

    fn chmod(path: &Path, mode: u32) -> Result<()> {
        fs::set_permissions(path, Permissions::from_mode(mode))
            .with_context(|| format!("Failed to change mode of {}", path.display()))
    }
}
