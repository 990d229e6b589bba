//! Configuration settings for clipstash.
//!
//! Settings are loaded from `~/.clipstash/config.yaml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::ClipstashError;
use crate::storage::DriverGeneration;

/// Main settings structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// General settings.
    pub general: GeneralSettings,
    /// Clipboard history storage.
    pub storage: StorageSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Default output format.
    pub output: OutputFormat,
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StorageSettings {
    /// Database driver generation.
    pub driver: DriverGeneration,
    /// Database file. Defaults to `~/.clipstash/clipstash.db`.
    pub database: Option<PathBuf>,
}

impl StorageSettings {
    /// The database file to use.
    #[must_use]
    pub fn database_path(&self, paths: &Paths) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| paths.database.clone())
    }
}

impl Settings {
    /// Load settings from the default path.
    ///
    /// If the settings file doesn't exist, returns default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be parsed.
    pub fn load() -> Result<Self, ClipstashError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load settings from a specific path.
    ///
    /// If the settings file doesn't exist, returns default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, ClipstashError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClipstashError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            ClipstashError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save settings to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ClipstashError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| ClipstashError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            ClipstashError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
