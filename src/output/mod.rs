//! Output formatting for clipstash.
//!
//! This module provides formatters for displaying history entries and actions
//! in various formats.

mod json;
mod pretty;

use serde::Serialize;

use crate::actions::{Action, ActionConfig, Captures, Invocation};
use crate::cli::args::OutputFormat;
use crate::core::ClipboardEntry;
use crate::error::ClipstashError;

pub use json::*;
pub use pretty::*;

/// An action that applies to an entry.
#[derive(Debug, Clone, Serialize)]
pub struct ActionMatch<'a> {
    #[serde(flatten)]
    pub action: &'a Action,
    pub is_default: bool,
    pub captures: Captures,
}

/// Format history entries based on output format
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn format_entries(
    entries: &[ClipboardEntry],
    format: OutputFormat,
) -> Result<String, ClipstashError> {
    match format {
        OutputFormat::Pretty => Ok(format_entries_pretty(entries)),
        OutputFormat::Json => format_entries_json(entries),
    }
}

/// Format a single entry based on output format
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn format_entry(
    entry: &ClipboardEntry,
    format: OutputFormat,
) -> Result<String, ClipstashError> {
    match format {
        OutputFormat::Pretty => Ok(format_entry_pretty(entry)),
        OutputFormat::Json => to_json(entry),
    }
}

/// Format the action tree based on output format
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn format_actions(
    config: &ActionConfig,
    format: OutputFormat,
) -> Result<String, ClipstashError> {
    match format {
        OutputFormat::Pretty => Ok(format_actions_pretty(config)),
        OutputFormat::Json => to_json(config),
    }
}

/// Format the actions applicable to an entry based on output format
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn format_matches(
    entry: &ClipboardEntry,
    matches: &[ActionMatch<'_>],
    format: OutputFormat,
) -> Result<String, ClipstashError> {
    match format {
        OutputFormat::Pretty => Ok(format_matches_pretty(entry, matches)),
        OutputFormat::Json => format_matches_json(entry, matches),
    }
}

/// Format a command invocation that was not run
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn format_invocation(
    invocation: &Invocation,
    format: OutputFormat,
) -> Result<String, ClipstashError> {
    match format {
        OutputFormat::Pretty => Ok(format_invocation_pretty(invocation)),
        OutputFormat::Json => format_invocation_json(invocation),
    }
}
