//! Building `Options` from the command line and the config file

use linkdirs_core::config::{
    Config, ConfigManager, ConfigMerger, DEFAULT_IGNORE_PATTERNS, Options, read_ignore_file,
};
use linkdirs_core::error::Result;
use linkdirs_core::filter::bucket_ignore_patterns;

use crate::cli::Cli;

/// Combine the config file with command-line flags
///
/// Ignore patterns are the defaults, then config file patterns, then
/// command-line patterns, then the contents of every ignore file.
///
/// # Errors
///
/// Returns an error if the config file or an ignore file cannot be read, or
/// an ignore pattern is invalid.
pub fn build_options(cli: &Cli) -> Result<Options> {
    let mut config = if cli.no_config {
        Config::default()
    } else {
        ConfigManager::load(cli.config.as_deref())?
    };
    ConfigMerger::merge_config(
        &mut config,
        Config {
            ignore_patterns: cli.ignore_pattern.clone(),
            ignore_files: cli.ignore_file.clone(),
            ignore_symlinks: cli.ignore_symlinks,
            ignore_unexpected_children: cli.ignore_unexpected_children,
            report_unexpected_files: cli.report_unexpected_files,
        },
    );

    let mut patterns: Vec<String> = DEFAULT_IGNORE_PATTERNS
        .iter()
        .map(ToString::to_string)
        .collect();
    patterns.extend(config.ignore_patterns);
    for path in &config.ignore_files {
        patterns.extend(read_ignore_file(path)?);
    }

    Ok(Options {
        dryrun: cli.dryrun,
        force: cli.force,
        ignore_symlinks: config.ignore_symlinks,
        ignore_unexpected_children: config.ignore_unexpected_children,
        report_unexpected_files: config.report_unexpected_files,
        delete_unexpected_files: cli.delete_unexpected_files,
        ignore: bucket_ignore_patterns(&patterns)?,
    })
}
