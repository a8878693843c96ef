//! A whole run: every source, then the unexpected-file pass

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::config::Options;
use crate::error::Result;
use crate::links::{lstat_if_exists, quote};
use crate::sync::{LinkResults, SyncEngine};
use crate::unexpected::report_unexpected_files;

/// Link every source directory into `dest`
///
/// Returns diffs, then errors, then unexpected-file messages. An empty list
/// means the destination mirrors the sources.
///
/// # Errors
///
/// Returns an error if a filesystem operation fails; policy conflicts are
/// messages, not errors.
pub fn link_directories(sources: &[PathBuf], dest: &Path, options: &Options) -> Result<Vec<String>> {
    let dest = normalize(dest);
    ensure_destination(&dest, options.dryrun)?;

    let engine = SyncEngine::new(options);
    let mut all_results = LinkResults::default();
    for source in sources {
        all_results.extend(engine.sync(&normalize(source), &dest)?);
    }

    let unexpected_messages = if options.checks_unexpected_files() {
        report_unexpected_files(&dest, &all_results.expected_files, options)?
    } else {
        Vec::new()
    };

    let mut messages = all_results.into_messages();
    messages.extend(unexpected_messages);
    info!(messages = messages.len(), "run finished");
    Ok(messages)
}

/// Drop trailing separators and `.` components so joined paths compare equal
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

fn ensure_destination(dest: &Path, dryrun: bool) -> Result<()> {
    if lstat_if_exists(dest)?.is_some() {
        return Ok(());
    }
    if dryrun {
        println!("mkdir -p {}", quote(dest));
        return Ok(());
    }
    info!(dest = %dest.display(), "creating destination");
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))
}
