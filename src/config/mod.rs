//! Configuration management for clipstash.
//!
//! This module handles loading and saving configuration from `~/.clipstash/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{GeneralSettings, Settings, StorageSettings};
