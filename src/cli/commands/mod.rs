//! Command implementations for clipstash.
//!
//! This module contains the implementation of all CLI commands. Every command
//! returns the text to print.

mod actions;
mod completions;
mod history;

pub use actions::actions;
pub use completions::completions;
pub use history::history;

use std::path::PathBuf;
use std::rc::Rc;

use crate::cli::args::{Cli, OutputFormat};
use crate::config::{Paths, Settings};
use crate::error::ClipstashError;
use crate::storage::{ConnectionSpec, DriverGeneration, EntryStore, TokioScheduler};

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    pub paths: Paths,
    pub format: OutputFormat,
    pub driver: DriverGeneration,
    pub database: PathBuf,
}

impl Context {
    /// Combine settings with command-line overrides.
    #[must_use]
    pub fn new(paths: Paths, settings: &Settings, cli: &Cli) -> Self {
        Self {
            format: cli.output.unwrap_or(settings.general.output),
            driver: cli.driver.unwrap_or(settings.storage.driver),
            database: cli
                .database
                .clone()
                .unwrap_or_else(|| settings.storage.database_path(&paths)),
            paths,
        }
    }

    /// Open the history store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn open_store(&self) -> Result<EntryStore, ClipstashError> {
        let spec = ConnectionSpec::from_path(&self.database);
        tracing::debug!(%spec, driver = %self.driver, "opening history store");
        EntryStore::open_spec(self.driver, &spec, Rc::new(TokioScheduler)).await
    }
}
