//! Options and configuration
//!
//! This module handles:
//! - the `Options` value consumed by the sync and unexpected-file passes
//! - config file discovery and TOML parsing with serde
//! - merging config files and command-line values
//! - reading ignore files
//! - validating option combinations

mod discovery;
mod ignore_file;
mod merge;
mod types;
mod validation;

#[cfg(test)]
mod integration_tests;

use std::path::Path;

pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use ignore_file::read_ignore_file;
pub use merge::ConfigMerger;
pub use types::{Config, DEFAULT_IGNORE_PATTERNS, Options};
pub use validation::ConfigValidator;

use crate::error::Result;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load the configuration file selected by `cli_config_path`, or the
    /// global one
    ///
    /// Returns `Config::default()` when no file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path does not exist, or a config file
    /// cannot be read, parsed, or validated.
    pub fn load(cli_config_path: Option<&Path>) -> Result<Config> {
        let config_files = ConfigDiscovery::discover(cli_config_path)?;
        let merged = ConfigMerger::merge(&config_files)?;
        ConfigValidator::validate_config(&merged)?;
        Ok(merged)
    }
}
