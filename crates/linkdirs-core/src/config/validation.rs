//! Configuration validation and error reporting

use super::types::{Config, Options};
use crate::error::Result;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate_config(config: &Config) -> Result<()> {
        for pattern in &config.ignore_patterns {
            if pattern.trim().is_empty() {
                anyhow::bail!("Ignore pattern cannot be empty");
            }
        }

        for path in &config.ignore_files {
            if path.as_os_str().is_empty() {
                anyhow::bail!("Ignore file path cannot be empty");
            }
        }

        Ok(())
    }

    /// Check option combinations, returning one message per problem
    #[must_use]
    pub fn validate_options(options: &Options) -> Vec<String> {
        let mut messages = Vec::new();
        if options.delete_unexpected_files && !options.ignore_unexpected_children {
            messages.push(
                "Cannot enable --delete_unexpected_files without --ignore_unexpected_children"
                    .to_string(),
            );
        }
        messages
    }
}
