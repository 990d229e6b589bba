//! Deciding whether an action applies to an entry.
//!
//! A malformed pattern, or one that exhausts the backtracking limit, makes
//! its action non-matching. It never fails the evaluation of other actions.

use fancy_regex::Regex;

use super::types::Action;
use crate::core::ClipboardEntry;

/// Capture groups of a match. Index 0 is the whole match; groups that did not
/// participate are `None`.
pub type Captures = Vec<Option<String>>;

fn compile(action: &Action, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::debug!(action = %action.id, error = %e, "ignoring malformed pattern");
            None
        }
    }
}

/// Whether `action` applies to `entry`.
#[must_use]
pub fn test_action(entry: &ClipboardEntry, action: &Action) -> bool {
    if !action.accepts(entry.item_type) {
        return false;
    }
    let Some(pattern) = action.pattern() else {
        return true;
    };

    compile(action, pattern).is_some_and(|regex| regex.is_match(&entry.content).unwrap_or(false))
}

/// Capture groups of `action`'s pattern in `entry`, or `None` if the action
/// does not apply.
///
/// Without a pattern the only capture is the whole content.
#[must_use]
pub fn match_action(entry: &ClipboardEntry, action: &Action) -> Option<Captures> {
    if !action.accepts(entry.item_type) {
        return None;
    }
    let Some(pattern) = action.pattern() else {
        return Some(vec![Some(entry.content.clone())]);
    };

    let regex = compile(action, pattern)?;
    let captures = regex.captures(&entry.content).ok()??;
    Some(
        captures
            .iter()
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect(),
    )
}
