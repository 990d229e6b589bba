//! Looking up actions by id and by per-type default.

use super::types::{Action, ActionConfig};
use crate::core::ClipboardEntry;

/// First action with `id`, searching submenus depth-first.
#[must_use]
pub fn find_action_by_id<'a>(config: &'a ActionConfig, id: &str) -> Option<&'a Action> {
    config.leaves().find(|action| action.id == id)
}

/// Whether `action` is the configured default for the entry's type.
#[must_use]
pub fn is_default_action(config: &ActionConfig, entry: &ClipboardEntry, action: &Action) -> bool {
    config
        .defaults
        .get(&entry.item_type)
        .is_some_and(|id| *id == action.id)
}

/// The default action for the entry's type.
///
/// A default that refers to a removed action means there is no default.
#[must_use]
pub fn find_default_action<'a>(
    config: &'a ActionConfig,
    entry: &ClipboardEntry,
) -> Option<&'a Action> {
    let id = config.defaults.get(&entry.item_type)?;
    find_action_by_id(config, id)
}
