//! Configuration manager for TOML file operations
//!
//! This module provides the `ConfigManager` which loads and saves the daemon
//! settings file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

use super::settings::DaemonSettings;

const CONFIG_FILE: &str = "config.toml";

/// Configuration manager for `vaultpick`
///
/// Settings are stored in `~/.config/vaultpick/config.toml` by default.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Full path of the settings file
    config_file: PathBuf,
}

impl ConfigManager {
    /// Creates a new `ConfigManager` with the default configuration directory
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined.
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from("~/.config")))?
            .join("vaultpick");
        Ok(Self::with_config_dir(&config_dir))
    }

    /// Creates a new `ConfigManager` reading `config.toml` from a custom directory
    #[must_use]
    pub fn with_config_dir(config_dir: &Path) -> Self {
        Self {
            config_file: config_dir.join(CONFIG_FILE),
        }
    }

    /// Creates a new `ConfigManager` for an explicit settings file
    #[must_use]
    pub fn with_config_file(config_file: PathBuf) -> Self {
        Self { config_file }
    }

    /// Returns the settings file path
    #[must_use]
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Loads settings, returning defaults if the file doesn't exist
    ///
    /// Leading `~` in paths is expanded and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load_settings(&self) -> ConfigResult<DaemonSettings> {
        let mut settings = if self.config_file.exists() {
            let content = fs::read_to_string(&self.config_file).map_err(|e| {
                ConfigError::Parse(format!(
                    "Failed to read {}: {}",
                    self.config_file.display(),
                    e
                ))
            })?;
            Self::parse_toml(&content, &self.config_file)?
        } else {
            tracing::debug!(
                "No settings file at {}, using defaults",
                self.config_file.display()
            );
            DaemonSettings::default()
        };

        settings.expand_paths();
        settings.validate()?;
        Ok(settings)
    }

    /// Saves settings, creating the parent directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_settings(&self, settings: &DaemonSettings) -> ConfigResult<()> {
        if let Some(parent) = self.config_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Write(format!(
                        "Failed to create config directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let content = toml::to_string_pretty(settings)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize: {e}")))?;

        fs::write(&self.config_file, content).map_err(|e| {
            ConfigError::Write(format!(
                "Failed to write {}: {}",
                self.config_file.display(),
                e
            ))
        })
    }

    fn parse_toml(content: &str, path: &Path) -> ConfigResult<DaemonSettings> {
        toml::from_str(content).map_err(|e| {
            ConfigError::Deserialize(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}
