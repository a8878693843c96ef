//! Configuration file discovery

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Configuration file locations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFiles {
    /// Config from the `--config` flag
    pub cli: Option<PathBuf>,
    /// Global config, consulted only without `--config`
    pub global: Option<PathBuf>,
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Find the configuration file to use
    ///
    /// An explicit path wins and must exist; otherwise the global config is
    /// used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if `cli_path` is given but is not a file.
    pub fn discover(cli_path: Option<&Path>) -> Result<ConfigFiles> {
        if let Some(path) = cli_path {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Ok(ConfigFiles {
                cli: Some(path.to_path_buf()),
                global: None,
            });
        }

        Ok(ConfigFiles {
            cli: None,
            global: Self::find_global_config(),
        })
    }

    /// Find global config in the user's config directory
    fn find_global_config() -> Option<PathBuf> {
        let config_dir = dirs::config_dir()?;
        let global_config = config_dir.join("linkdirs").join("config.toml");

        if global_config.is_file() {
            Some(global_config)
        } else {
            None
        }
    }
}
