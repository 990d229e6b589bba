//! Loading and saving the action configuration file.
//!
//! The file is JSON, indented with tabs. `CLIPSTASH_ACTIONS=default` makes
//! clipstash ignore the file and use the bundled configuration; any other
//! value of the variable is read as the path of an alternate file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::defaults::bundled;
use super::types::ActionConfig;
use crate::error::ClipstashError;

/// Environment variable overriding the configuration file.
pub const ACTIONS_ENV: &str = "CLIPSTASH_ACTIONS";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Bundled,
    File(PathBuf),
}

impl ConfigSource {
    /// Resolve the source from the value of [`ACTIONS_ENV`].
    #[must_use]
    pub fn resolve(env_value: Option<&str>, default_path: &Path) -> Self {
        match env_value {
            Some("default") => Self::Bundled,
            Some(path) if !path.is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::File(default_path.to_path_buf()),
        }
    }

    /// Resolve the source from the process environment.
    #[must_use]
    pub fn from_env(default_path: &Path) -> Self {
        Self::resolve(std::env::var(ACTIONS_ENV).ok().as_deref(), default_path)
    }
}

/// Load the configuration, honoring [`ACTIONS_ENV`].
///
/// Never fails: a missing file yields the bundled configuration (written to
/// disk when `save_if_missing`), and an unreadable or malformed file is
/// logged and replaced by the bundled configuration.
#[must_use]
pub fn load_config(path: &Path, save_if_missing: bool) -> ActionConfig {
    load_from_source(&ConfigSource::from_env(path), save_if_missing)
}

/// Load the configuration from an explicit source.
#[must_use]
pub fn load_from_source(source: &ConfigSource, save_if_missing: bool) -> ActionConfig {
    let path = match source {
        ConfigSource::Bundled => return bundled(),
        ConfigSource::File(path) => path,
    };

    if !path.exists() {
        let config = bundled();
        if save_if_missing {
            if let Err(e) = save_config(path, &config, false) {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "failed to save actions config"
                );
            }
        }
        return config;
    }

    match read_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to load actions config");
            bundled()
        }
    }
}

/// Read and parse a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_config(path: &Path) -> Result<ActionConfig, ClipstashError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ClipstashError::Config(format!(
            "Failed to read actions config {}: {e}",
            path.display()
        ))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        ClipstashError::Config(format!(
            "Failed to parse actions config {}: {e}",
            path.display()
        ))
    })
}

/// Path of the backup kept by [`save_config`].
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push("~");
    PathBuf::from(name)
}

/// Write the configuration, replacing the file atomically.
///
/// With `backup`, the previous file is kept next to it with a `~` suffix.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be written.
pub fn save_config(path: &Path, config: &ActionConfig, backup: bool) -> Result<(), ClipstashError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| {
            ClipstashError::Config(format!("Failed to create directory {}: {e}", dir.display()))
        })?;
    }

    let contents = to_tab_indented_json(config)?;

    if backup && path.exists() {
        if let Err(e) = fs::copy(path, backup_path(path)) {
            tracing::warn!(path = %path.display(), error = %e, "failed to back up actions config");
        }
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, contents)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|e| {
            ClipstashError::Config(format!(
                "Failed to write actions config {}: {e}",
                path.display()
            ))
        })
}

fn to_tab_indented_json(config: &ActionConfig) -> Result<String, ClipstashError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| ClipstashError::Config(e.to_string()))
}
