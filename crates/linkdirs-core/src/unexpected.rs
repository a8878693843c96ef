//! Destination entries that no source accounts for
//!
//! After every source has been linked, the destination is walked a second
//! time. Anything not in the expected set is unexpected: it can be reported,
//! and files (plus directories with `--force`) can be deleted.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::Options;
use crate::error::Result;
use crate::links::{lstat_if_exists, quote_all, safe_unlink};

/// Destination-only entries found by [`find_unexpected_paths`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnexpectedPaths {
    /// Files, symlinks and other non-directories
    pub files: Vec<PathBuf>,
    /// Real directories
    pub directories: Vec<PathBuf>,
}

impl UnexpectedPaths {
    /// Whether nothing unexpected was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

/// Walk `dest` and collect every entry not in `expected`
///
/// Ignored names and paths are neither reported nor descended into. With
/// `ignore_unexpected_children`, unexpected top-level directories (and
/// symlinks to directories) are skipped together with their contents. The
/// root itself is always expected. A missing root, possible after a dry-run
/// that would have created it, has no unexpected entries.
///
/// # Errors
///
/// Returns an error if the destination cannot be walked.
pub fn find_unexpected_paths(
    dest: &Path,
    expected: &BTreeSet<PathBuf>,
    options: &Options,
) -> Result<UnexpectedPaths> {
    let mut unexpected = UnexpectedPaths::default();
    if lstat_if_exists(dest)?.is_none() {
        debug!(dest = %dest.display(), "destination does not exist");
        return Ok(unexpected);
    }

    let walker = WalkDir::new(dest)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| should_visit(entry, expected, options));

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", dest.display()))?;
        if expected.contains(entry.path()) {
            continue;
        }
        if entry.file_type().is_dir() {
            unexpected.directories.push(entry.into_path());
        } else {
            unexpected.files.push(entry.into_path());
        }
    }

    Ok(unexpected)
}

fn should_visit(entry: &DirEntry, expected: &BTreeSet<PathBuf>, options: &Options) -> bool {
    let ignore = &options.ignore;
    if ignore.is_ignored_name(entry.file_name()) || ignore.is_ignored_path(entry.path()) {
        return false;
    }

    let skip_child = entry.depth() == 1
        && options.ignore_unexpected_children
        && is_directory_like(entry)
        && !expected.contains(entry.path());
    if skip_child {
        debug!(path = %entry.path().display(), "skipping unexpected child");
    }
    !skip_child
}

fn is_directory_like(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

/// Delete unexpected files, and unexpected directories with `--force`
///
/// Deleted entries are removed from `unexpected`, so they are not reported
/// afterwards. Without `--force` directories are kept and a single message
/// names them.
///
/// # Errors
///
/// Returns an error if an entry cannot be removed.
pub fn delete_unexpected_files(
    unexpected: &mut UnexpectedPaths,
    options: &Options,
) -> Result<Vec<String>> {
    for file in unexpected.files.drain(..) {
        safe_unlink(&file, options.dryrun)?;
    }

    if unexpected.directories.is_empty() {
        return Ok(Vec::new());
    }
    if !options.force {
        let directories: Vec<String> = unexpected
            .directories
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        return Ok(vec![format!(
            "Refusing to delete directories without --force/-f: {}",
            directories.join(" ")
        )]);
    }

    sort_longest_first(&mut unexpected.directories);
    for directory in unexpected.directories.drain(..) {
        safe_unlink(&directory, options.dryrun)?;
    }
    Ok(Vec::new())
}

/// Report lines for unexpected entries
///
/// Directories are listed before files, each group sorted, followed by
/// ready-to-run `rm` and `rmdir` commands. `rmdir` lists children before
/// their parents.
pub fn format_unexpected_files(unexpected: &mut UnexpectedPaths) -> Vec<String> {
    unexpected.directories.sort();
    unexpected.files.sort();

    let mut messages: Vec<String> = unexpected
        .directories
        .iter()
        .map(|d| format!("Unexpected directory: {}", d.display()))
        .chain(
            unexpected
                .files
                .iter()
                .map(|f| format!("Unexpected file: {}", f.display())),
        )
        .collect();

    if !unexpected.files.is_empty() {
        messages.push(format!("rm {}", quote_all(&unexpected.files)));
    }
    if !unexpected.directories.is_empty() {
        sort_longest_first(&mut unexpected.directories);
        messages.push(format!("rmdir {}", quote_all(&unexpected.directories)));
    }
    messages
}

/// Find, optionally delete, and report unexpected entries below `dest`
///
/// Deletion messages come before report lines.
///
/// # Errors
///
/// Returns an error if the destination cannot be walked or an entry cannot
/// be removed.
pub fn report_unexpected_files(
    dest: &Path,
    expected: &BTreeSet<PathBuf>,
    options: &Options,
) -> Result<Vec<String>> {
    let mut unexpected = find_unexpected_paths(dest, expected, options)?;
    info!(
        files = unexpected.files.len(),
        directories = unexpected.directories.len(),
        "found unexpected paths"
    );

    let mut messages = Vec::new();
    if options.delete_unexpected_files {
        messages.extend(delete_unexpected_files(&mut unexpected, options)?);
    }
    messages.extend(format_unexpected_files(&mut unexpected));
    Ok(messages)
}

/// Stable sort by descending path length
fn sort_longest_first(paths: &mut [PathBuf]) {
    paths.sort_by_key(|p| Reverse(p.as_os_str().len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::bucket_ignore_patterns;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn options() -> Options {
        Options {
            report_unexpected_files: true,
            ignore_unexpected_children: true,
            ..Options::default()
        }
    }

    fn expect(dest: &Path, relative: &[&str]) -> BTreeSet<PathBuf> {
        relative.iter().map(|r| dest.join(r)).collect()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_report_unexpected_files() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("x");
        touch(&dest.join("file"));
        touch(&dest.join("asdf/file"));
        touch(&dest.join("asdf/ignore-some/dont-ignore"));
        touch(&dest.join("pinky"));
        touch(&dest.join("the_brain"));
        fs::create_dir_all(dest.join("subdir")).unwrap();
        fs::create_dir_all(dest.join("asdf/report_me")).unwrap();
        touch(&dest.join("asdf/ignore-some/should-be-ignored/a-file"));
        touch(&dest.join("asdf/delete dir with spaces/delete file with spaces"));
        fs::create_dir_all(tmp.path().join("foo")).unwrap();
        symlink(tmp.path().join("foo"), dest.join("symlink-to-skip")).unwrap();
        symlink(tmp.path().join("foo"), dest.join("asdf/symlink-to-report")).unwrap();

        let expected = expect(
            &dest,
            &[
                "file",
                "asdf",
                "asdf/file",
                "asdf/ignore-some",
                "asdf/ignore-some/dont-ignore",
            ],
        );
        let options = Options {
            ignore: bucket_ignore_patterns(&["ignore-some/should-be-ignored"]).unwrap(),
            ..options()
        };

        let messages = report_unexpected_files(&dest, &expected, &options).unwrap();

        let d = dest.display();
        assert_eq!(
            messages,
            vec![
                format!("Unexpected directory: {d}/asdf/delete dir with spaces"),
                format!("Unexpected directory: {d}/asdf/report_me"),
                format!("Unexpected file: {d}/asdf/delete dir with spaces/delete file with spaces"),
                format!("Unexpected file: {d}/asdf/symlink-to-report"),
                format!("Unexpected file: {d}/pinky"),
                format!("Unexpected file: {d}/the_brain"),
                format!(
                    "rm '{d}/asdf/delete dir with spaces/delete file with spaces' \
                     {d}/asdf/symlink-to-report {d}/pinky {d}/the_brain"
                ),
                format!("rmdir '{d}/asdf/delete dir with spaces' {d}/asdf/report_me"),
            ]
        );
        assert!(dest.join("the_brain").exists());
    }

    #[test]
    fn test_nested_unexpected_children_are_reported() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("x");
        touch(&dest.join("subdir/nested/file"));

        let reporting = Options {
            ignore_unexpected_children: false,
            ..options()
        };
        let unexpected = find_unexpected_paths(&dest, &BTreeSet::new(), &reporting).unwrap();

        assert_eq!(
            unexpected.directories,
            [dest.join("subdir"), dest.join("subdir/nested")]
        );
        assert_eq!(unexpected.files, [dest.join("subdir/nested/file")]);
    }

    #[test]
    fn test_delete_unexpected_files() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("x");
        touch(&dest.join("file"));
        touch(&dest.join("asdf/file"));
        touch(&dest.join("pinky"));
        touch(&dest.join("the_brain"));
        fs::create_dir_all(dest.join("subdir")).unwrap();
        fs::create_dir_all(tmp.path().join("foo")).unwrap();
        symlink(tmp.path().join("foo"), dest.join("symlink-to-skip")).unwrap();
        symlink(tmp.path().join("foo"), dest.join("asdf/symlink-to-delete")).unwrap();
        let expected = expect(&dest, &["file", "asdf", "asdf/file"]);
        let options = Options {
            delete_unexpected_files: true,
            ..options()
        };

        let messages = report_unexpected_files(&dest, &expected, &options).unwrap();

        assert!(messages.is_empty(), "{messages:?}");
        assert!(!dest.join("the_brain").exists());
        assert!(!dest.join("pinky").exists());
        assert!(fs::symlink_metadata(dest.join("symlink-to-skip")).is_ok());
        assert!(tmp.path().join("foo").is_dir());
        assert!(fs::symlink_metadata(dest.join("asdf/symlink-to-delete")).is_err());
        assert!(dest.join("subdir").is_dir());
    }

    #[test]
    fn test_delete_unexpected_keeps_dirs() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("x");
        touch(&dest.join("asdf/file"));
        touch(&dest.join("pinky"));
        fs::create_dir_all(dest.join("subdir")).unwrap();
        fs::create_dir_all(dest.join("asdf/report_me")).unwrap();
        fs::create_dir_all(dest.join("asdf/report_me_too")).unwrap();
        let expected = expect(&dest, &["asdf", "asdf/file"]);
        let options = Options {
            delete_unexpected_files: true,
            ..options()
        };

        let messages = report_unexpected_files(&dest, &expected, &options).unwrap();

        let d = dest.display();
        assert_eq!(
            messages,
            vec![
                format!(
                    "Refusing to delete directories without --force/-f: \
                     {d}/asdf/report_me {d}/asdf/report_me_too"
                ),
                format!("Unexpected directory: {d}/asdf/report_me"),
                format!("Unexpected directory: {d}/asdf/report_me_too"),
                format!("rmdir {d}/asdf/report_me_too {d}/asdf/report_me"),
            ]
        );
        assert!(!dest.join("pinky").exists());
        assert!(dest.join("asdf/report_me").is_dir());
    }

    #[test]
    fn test_force_removes_unexpected_dirs() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("x");
        touch(&dest.join("asdf/file"));
        touch(&dest.join("pinky"));
        fs::create_dir_all(dest.join("asdf/delete_me/delete_me_too")).unwrap();
        let expected = expect(&dest, &["asdf", "asdf/file"]);
        let options = Options {
            delete_unexpected_files: true,
            force: true,
            ..options()
        };

        let messages = report_unexpected_files(&dest, &expected, &options).unwrap();

        assert!(messages.is_empty(), "{messages:?}");
        assert!(!dest.join("pinky").exists());
        assert!(!dest.join("asdf/delete_me").exists());
        assert!(dest.join("asdf/file").exists());
    }

    #[test]
    fn test_dryrun_delete_keeps_everything() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("x");
        touch(&dest.join("pinky"));
        let options = Options {
            delete_unexpected_files: true,
            dryrun: true,
            ..options()
        };

        let messages = report_unexpected_files(&dest, &BTreeSet::new(), &options).unwrap();

        assert!(messages.is_empty());
        assert!(dest.join("pinky").exists());
    }

    #[test]
    fn test_nothing_unexpected() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("x");
        touch(&dest.join("dir/file"));
        let expected = expect(&dest, &["dir", "dir/file"]);

        let unexpected = find_unexpected_paths(&dest, &expected, &options()).unwrap();

        assert!(unexpected.is_empty());
        assert!(report_unexpected_files(&dest, &expected, &options()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_destination() {
        let tmp = TempDir::new().unwrap();
        let unexpected =
            find_unexpected_paths(&tmp.path().join("missing"), &BTreeSet::new(), &options())
                .unwrap();

        assert!(unexpected.is_empty());
    }

    #[test]
    fn test_format_orders_rmdir_longest_first() {
        let mut unexpected = UnexpectedPaths {
            files: vec![PathBuf::from("/z/b"), PathBuf::from("/z/a")],
            directories: vec![PathBuf::from("/z/d"), PathBuf::from("/z/d/e"), PathBuf::from("/z/c")],
        };

        let messages = format_unexpected_files(&mut unexpected);

        assert_eq!(
            messages,
            [
                "Unexpected directory: /z/c",
                "Unexpected directory: /z/d",
                "Unexpected directory: /z/d/e",
                "Unexpected file: /z/a",
                "Unexpected file: /z/b",
                "rm /z/a /z/b",
                "rmdir /z/d/e /z/c /z/d",
            ]
        );
    }
}
