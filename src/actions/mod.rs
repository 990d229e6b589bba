//! Action configuration engine.
//!
//! Actions are user-defined operations on clipboard entries, grouped in
//! submenus and selected by item type and content pattern:
//! - [`matcher`] decides whether an action applies to an entry
//! - [`resolver`] looks actions up by id and per-type default
//! - [`merge`] brings new bundled actions into a user's configuration
//! - [`file`] loads and saves the configuration file
//! - [`command`] runs command actions

pub mod command;
pub mod defaults;
pub mod file;
pub mod matcher;
pub mod merge;
pub mod resolver;
mod types;

pub use command::{plan, ActionResult, Invocation, Plan};
pub use defaults::bundled;
pub use file::{load_config, save_config, ConfigSource, ACTIONS_ENV};
pub use matcher::{match_action, test_action, Captures};
pub use merge::{collect_ids, count_difference, merge_config, upgrade_config};
pub use resolver::{find_action_by_id, find_default_action, is_default_action};
pub use types::{
    Action, ActionConfig, ActionEntry, ActionKind, ActionOutput, ActionSubmenu, ColorSpace,
    Leaves,
};
