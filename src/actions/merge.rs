//! Reconciling an updated bundled configuration with a user's configuration.
//!
//! Actions are identified by id. Merging only ever adds actions the user
//! configuration does not already have; it never reorders, edits or removes
//! anything the user has.

use std::collections::HashSet;

use super::types::{ActionConfig, ActionEntry, ActionSubmenu, Leaves};

/// Ids of every action in `entries`, depth-first. Duplicates are kept.
pub fn collect_ids(entries: &[ActionEntry]) -> impl Iterator<Item = &str> {
    Leaves::new(entries).map(|action| action.id.as_str())
}

/// Number of ids in `config2` that do not occur in `config1`.
///
/// An id repeated in `config2` counts once per occurrence.
#[must_use]
pub fn count_difference(config1: &ActionConfig, config2: &ActionConfig) -> usize {
    let known: HashSet<&str> = collect_ids(&config1.actions).collect();
    collect_ids(&config2.actions)
        .filter(|id| !known.contains(id))
        .count()
}

/// Entries of `entries` whose ids are not `known`. Submenus left empty are
/// dropped.
fn unknown_entries(entries: &[ActionEntry], known: &HashSet<&str>) -> Vec<ActionEntry> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            ActionEntry::Submenu(submenu) => {
                let actions = unknown_entries(&submenu.actions, known);
                (!actions.is_empty()).then(|| {
                    ActionEntry::Submenu(ActionSubmenu {
                        name: submenu.name.clone(),
                        actions,
                    })
                })
            }
            ActionEntry::Action(action) => {
                (!known.contains(action.id.as_str())).then(|| entry.clone())
            }
        })
        .collect()
}

/// Add the actions of `config2` missing from `config1`.
///
/// New actions inside a submenu are appended to the first top-level submenu
/// of `config1` with the same name. Everything else new is appended at the
/// end, in `config2` order. The defaults of `config1` are kept as they are and
/// those of `config2` are ignored.
#[must_use]
pub fn merge_config(config1: &ActionConfig, config2: &ActionConfig) -> ActionConfig {
    let known: HashSet<&str> = collect_ids(&config1.actions).collect();
    let mut remaining = unknown_entries(&config2.actions, &known);

    let mut actions = Vec::with_capacity(config1.actions.len() + remaining.len());
    for entry in &config1.actions {
        let ActionEntry::Submenu(submenu) = entry else {
            actions.push(entry.clone());
            continue;
        };

        let mut joined = Vec::new();
        remaining.retain(|candidate| match candidate {
            ActionEntry::Submenu(other) if other.name == submenu.name => {
                joined.extend(other.actions.iter().cloned());
                false
            }
            _ => true,
        });

        if joined.is_empty() {
            actions.push(entry.clone());
        } else {
            let mut merged = submenu.actions.clone();
            merged.append(&mut joined);
            actions.push(ActionEntry::Submenu(ActionSubmenu {
                name: submenu.name.clone(),
                actions: merged,
            }));
        }
    }
    actions.append(&mut remaining);

    ActionConfig {
        actions,
        defaults: config1.defaults.clone(),
    }
}

/// Merge `bundled` into `user` if it has actions the user does not.
///
/// Returns the merged configuration and the number of added actions.
#[must_use]
pub fn upgrade_config(
    user: &ActionConfig,
    bundled: &ActionConfig,
) -> Option<(ActionConfig, usize)> {
    let added = count_difference(user, bundled);
    if added == 0 {
        return None;
    }

    tracing::info!(added, "merging new bundled actions into configuration");
    Some((merge_config(user, bundled), added))
}
