//! JSON output formatting for clipstash.

use serde::Serialize;
use serde_json::json;

use super::ActionMatch;
use crate::actions::Invocation;
use crate::core::ClipboardEntry;
use crate::error::ClipstashError;

/// Format history entries as JSON
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn format_entries_json(entries: &[ClipboardEntry]) -> Result<String, ClipstashError> {
    let output = json!({
        "count": entries.len(),
        "items": entries
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the actions applicable to an entry as JSON
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn format_matches_json(
    entry: &ClipboardEntry,
    matches: &[ActionMatch<'_>],
) -> Result<String, ClipstashError> {
    let output = json!({
        "entry": entry,
        "count": matches.len(),
        "actions": matches
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a command invocation as JSON
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn format_invocation_json(invocation: &Invocation) -> Result<String, ClipstashError> {
    let output = json!({
        "command": invocation.command,
        "args": invocation.args,
        "output": invocation.output
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, ClipstashError> {
    Ok(serde_json::to_string_pretty(value)?)
}
