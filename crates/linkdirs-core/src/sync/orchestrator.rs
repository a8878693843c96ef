//! Sync orchestration - walks a source tree and links it into a destination

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use super::LinkResults;
use super::actions::{DirAction, FileAction};
use super::executor::ActionExecutor;
use crate::config::Options;
use crate::error::Result;

/// Children of one source directory, filtered and sorted by name
#[derive(Debug, Default)]
struct Children {
    subdirs: Vec<OsString>,
    files: Vec<OsString>,
}

/// Main sync engine
pub struct SyncEngine<'a> {
    options: &'a Options,
    executor: ActionExecutor,
}

impl<'a> SyncEngine<'a> {
    /// Create a new sync engine
    #[must_use]
    pub const fn new(options: &'a Options) -> Self {
        Self {
            options,
            executor: ActionExecutor::new(options.dryrun),
        }
    }

    /// Link every file below `source` into the same place below `dest`
    ///
    /// Policy conflicts are collected in the returned [`LinkResults`];
    /// traversal continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if a filesystem operation fails, e.g. `source` cannot
    /// be read or a hardlink crosses filesystems.
    pub fn sync(&self, source: &Path, dest: &Path) -> Result<LinkResults> {
        info!(source = %source.display(), dest = %dest.display(), "linking directory");
        let results = self.link_dir(source, dest, false)?;
        debug!(
            expected = results.expected_files.len(),
            diffs = results.diffs.len(),
            errors = results.errors.len(),
            "finished linking directory"
        );
        Ok(results)
    }

    /// Sync one level, then descend into each subdirectory in name order
    ///
    /// `new_dest` means `dest_dir` is being created by this run, so nothing
    /// below it is stat'ed.
    fn link_dir(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        new_dest: bool,
    ) -> Result<LinkResults> {
        let children = self.read_children(source_dir)?;
        let mut results = LinkResults::default();

        let mut descend: Vec<(PathBuf, PathBuf, bool)> =
            Vec::with_capacity(children.subdirs.len());
        for name in &children.subdirs {
            let source_subdir = source_dir.join(name);
            let dest_subdir = dest_dir.join(name);
            results.expected_files.insert(dest_subdir.clone());

            let action = if new_dest {
                DirAction::resolve_in_new_parent(&source_subdir)?
            } else {
                DirAction::resolve(&source_subdir, &dest_subdir, self.options.force)?
            };
            debug!(path = %dest_subdir.display(), ?action, "directory");
            self.executor.execute_dir(action, &dest_subdir, &mut results)?;

            if action.descends() {
                descend.push((source_subdir, dest_subdir, action.creates()));
            }
        }

        results.extend(self.link_files(source_dir, dest_dir, &children.files, new_dest)?);

        for (source_subdir, dest_subdir, created) in descend {
            results.extend(self.link_dir(&source_subdir, &dest_subdir, created)?);
        }

        Ok(results)
    }

    fn link_files(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        files: &[OsString],
        new_dest: bool,
    ) -> Result<LinkResults> {
        let mut results = LinkResults::default();
        for name in files {
            let source = source_dir.join(name);
            let dest = dest_dir.join(name);
            // Expected even if linking it fails below.
            results.expected_files.insert(dest.clone());

            let action = if new_dest {
                FileAction::resolve_in_new_parent(&source, self.options)?
            } else {
                FileAction::resolve(&source, &dest, self.options)?
            };
            debug!(path = %dest.display(), ?action, "file");
            self.executor.execute_file(action, &source, &dest, &mut results)?;
        }
        Ok(results)
    }

    /// Read, classify, filter and sort the children of `dir`
    ///
    /// Symlinks, including symlinks to directories, are files.
    fn read_children(&self, dir: &Path) -> Result<Children> {
        let ignore = &self.options.ignore;
        let mut children = Children::default();

        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
            let name = entry.file_name();
            let path = entry.path();
            if ignore.is_ignored_name(&name) || ignore.is_ignored_path(&path) {
                debug!(path = %path.display(), "ignored");
                continue;
            }

            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", path.display()))?;
            if file_type.is_dir() {
                children.subdirs.push(name);
            } else {
                children.files.push(name);
            }
        }

        children.subdirs.sort();
        children.files.sort();
        Ok(children)
    }
}
