//! Configuration merging
//!
//! # Merging Semantics
//!
//! - **Lists** (`ignore_patterns`, `ignore_files`): additive
//! - **Booleans**: OR semantics - if any source sets `true`, the result is `true`
//!
//! The same rules apply when command-line values are layered on top of the
//! file, so a switch enabled in the config file cannot be turned off from the
//! command line.

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::discovery::ConfigFiles;
use super::types::Config;
use crate::error::Result;

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge the discovered config files, global first
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Config> {
        let mut merged = Config::default();

        if let Some(global) = &files.global {
            Self::merge_into(&mut merged, global)?;
        }

        if let Some(cli) = &files.cli {
            Self::merge_into(&mut merged, cli)?;
        }

        Ok(merged)
    }

    /// Layer `overlay` on top of `base`
    pub fn merge_config(base: &mut Config, overlay: Config) {
        base.ignore_patterns.extend(overlay.ignore_patterns);
        base.ignore_files.extend(overlay.ignore_files);

        base.ignore_symlinks |= overlay.ignore_symlinks;
        base.ignore_unexpected_children |= overlay.ignore_unexpected_children;
        base.report_unexpected_files |= overlay.report_unexpected_files;
    }

    /// Load and merge a single config file into the existing config
    fn merge_into(base: &mut Config, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Self::merge_config(base, config);
        Ok(())
    }
}
