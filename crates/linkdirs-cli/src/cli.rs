use clap::Parser;
use std::path::{Path, PathBuf};

/// Mirror directory trees into a destination using hardlinks
///
/// Every file under each SOURCE_DIRECTORY is hardlinked to the same place
/// under DESTINATION_DIRECTORY. Files whose contents differ are reported as
/// diffs and left alone unless --force is given. Each message is printed on
/// its own line and the exit status is 1 when there are any.
#[derive(Parser, Debug)]
#[command(name = "linkdirs")]
#[command(about, long_about, version)]
#[command(override_usage = "linkdirs [OPTIONS] SOURCE_DIRECTORY [...] DESTINATION_DIRECTORY")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Perform a trial run with no changes made
    #[arg(long = "dryrun", visible_alias = "dry-run")]
    pub dryrun: bool,

    /// Remove existing files if necessary
    #[arg(short, long)]
    pub force: bool,

    /// File containing shell patterns to ignore (repeatable)
    #[arg(long = "ignore_file", visible_alias = "ignore-file", value_name = "FILENAME")]
    pub ignore_file: Vec<PathBuf>,

    /// Extra shell pattern to ignore, appended to: CVS .git .gitignore
    /// .gitmodules .hg .svn *.swp (repeatable)
    #[arg(long = "ignore_pattern", visible_alias = "ignore-pattern", value_name = "PATTERN")]
    pub ignore_pattern: Vec<String>,

    /// Skip symbolic links in source directories without reporting them
    #[arg(long = "ignore_symlinks", visible_alias = "ignore-symlinks")]
    pub ignore_symlinks: bool,

    /// When checking for unexpected files, ignore unexpected child directories
    /// of DESTINATION_DIRECTORY; unexpected grandchildren are still checked
    #[arg(
        long = "ignore_unexpected_children",
        visible_alias = "ignore-unexpected-children"
    )]
    pub ignore_unexpected_children: bool,

    /// Report unexpected files in DESTINATION_DIRECTORY
    #[arg(
        long = "report_unexpected_files",
        visible_alias = "report-unexpected-files"
    )]
    pub report_unexpected_files: bool,

    /// Delete unexpected files in DESTINATION_DIRECTORY (directories too with --force)
    #[arg(
        long = "delete_unexpected_files",
        visible_alias = "delete-unexpected-files"
    )]
    pub delete_unexpected_files: bool,

    /// Print the effective options to stderr before running
    #[arg(long)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Use specific config file
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// SOURCE_DIRECTORY [...] DESTINATION_DIRECTORY
    #[arg(value_name = "DIRECTORY", num_args = 2.., required = true)]
    pub directories: Vec<PathBuf>,
}

impl Cli {
    /// Source directories and the destination, which is the last directory
    pub fn split_directories(&self) -> (&[PathBuf], &Path) {
        match self.directories.split_last() {
            Some((dest, sources)) => (sources, dest),
            // clap requires at least two directories
            None => (&[], Path::new("")),
        }
    }
}
