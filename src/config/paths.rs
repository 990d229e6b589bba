//! Path resolution for clipstash configuration and data files.
//!
//! All clipstash data is stored in `~/.clipstash/`:
//! - `config.yaml` - Settings file
//! - `actions.json` - Action configuration
//! - `clipstash.db` - SQLite database holding the clipboard history

use std::path::PathBuf;

use crate::error::ClipstashError;

/// Paths to clipstash configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.clipstash/`
    pub root: PathBuf,
    /// Settings file: `~/.clipstash/config.yaml`
    pub config_file: PathBuf,
    /// Action configuration: `~/.clipstash/actions.json`
    pub actions_file: PathBuf,
    /// Database file: `~/.clipstash/clipstash.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ClipstashError> {
        let home = std::env::var("HOME").map_err(|_| {
            ClipstashError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".clipstash")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            actions_file: root.join("actions.json"),
            database: root.join("clipstash.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), ClipstashError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                ClipstashError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".clipstash"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-clipstash");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.actions_file, root.join("actions.json"));
        assert_eq!(paths.database, root.join("clipstash.db"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested/.clipstash"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
    }
}
