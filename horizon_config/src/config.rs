use crate::error::{ConfigError, ConfigResult};
use crate::settings::{FollowerSettings, LOG_LEVELS, LogSettings, TreeSettings};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for the horizon runner
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tree policy
    pub tree: TreeSettings,
    /// Fixture runner behavior
    pub follower: FollowerSettings,
    /// Log filter
    pub log: LogSettings,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get configuration file search paths, first match wins
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join("horizon.toml"));
            paths.push(current_dir.join(".horizon.toml"));
        }

        // User-specific config
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(
                PathBuf::from(&home)
                    .join(".config")
                    .join("horizon")
                    .join("config.toml"),
            );
        }

        paths
    }

    /// Load configuration with automatic path discovery
    pub fn load() -> ConfigResult<Self> {
        Self::load_with_paths(&Self::config_paths())
    }

    /// Load configuration with custom search paths
    pub fn load_with_paths(paths: &[PathBuf]) -> ConfigResult<Self> {
        for path in paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        // Return default configuration if no config file found
        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if !LogSettings::is_valid_level(&self.log.level) {
            return Err(ConfigError::Validation(format!(
                "unknown log level `{}`, expected one of {}",
                self.log.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}
