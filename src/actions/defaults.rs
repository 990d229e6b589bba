//! The action configuration shipped with clipstash.

use std::collections::BTreeMap;

use super::types::{
    Action, ActionConfig, ActionEntry, ActionKind, ActionOutput, ActionSubmenu, ColorSpace,
};
use crate::core::ItemType;

fn command(
    id: &str,
    name: &str,
    pattern: Option<&str>,
    types: &[ItemType],
    command: &str,
    output: ActionOutput,
) -> ActionEntry {
    ActionEntry::Action(Action {
        id: id.to_string(),
        name: name.to_string(),
        pattern: pattern.map(str::to_string),
        types: Some(types.to_vec()),
        output,
        shortcut: Some(Vec::new()),
        kind: ActionKind::Command {
            command: command.to_string(),
        },
    })
}

fn color(id: &str, name: &str, pattern: &str, space: ColorSpace) -> ActionEntry {
    ActionEntry::Action(Action {
        id: id.to_string(),
        name: name.to_string(),
        pattern: Some(pattern.to_string()),
        types: Some(vec![ItemType::Color]),
        output: ActionOutput::Paste,
        shortcut: Some(Vec::new()),
        kind: ActionKind::Color { space },
    })
}

fn submenu(name: &str, actions: Vec<ActionEntry>) -> ActionEntry {
    ActionEntry::Submenu(ActionSubmenu {
        name: name.to_string(),
        actions,
    })
}

/// The bundled configuration.
#[must_use]
pub fn bundled() -> ActionConfig {
    let actions = vec![
        submenu(
            "Open",
            vec![
                command(
                    "open-with-default",
                    "Open with Default",
                    None,
                    &[ItemType::Image, ItemType::File],
                    "xargs xdg-open",
                    ActionOutput::Ignore,
                ),
                command(
                    "open-with-files",
                    "Open with Files",
                    Some("^(.*)"),
                    &[ItemType::Image, ItemType::File, ItemType::Files],
                    "nautilus -s $1",
                    ActionOutput::Ignore,
                ),
                command(
                    "open-with-browser",
                    "Open with Browser",
                    None,
                    &[ItemType::Link],
                    "xargs xdg-open",
                    ActionOutput::Ignore,
                ),
            ],
        ),
        command(
            "paste-as-path",
            "Paste as Path",
            None,
            &[ItemType::Image, ItemType::File, ItemType::Files],
            "cut -c8-",
            ActionOutput::Paste,
        ),
        submenu(
            "Convert",
            vec![
                color("rgb", "Rgb", "^(?!rgb)", ColorSpace::Rgb),
                color("hex", "Hex", "^(?!#)", ColorSpace::Hex),
                color("hsl", "Hsl", "^(?!hsl)", ColorSpace::Hsl),
                color("oklch", "Oklch", "^(?!oklch)", ColorSpace::Oklch),
            ],
        ),
        ActionEntry::Action(Action {
            id: "qrcode".to_string(),
            name: "QR Code".to_string(),
            pattern: None,
            types: Some(vec![
                ItemType::Text,
                ItemType::Code,
                ItemType::Link,
                ItemType::Character,
                ItemType::Color,
            ]),
            output: ActionOutput::Ignore,
            shortcut: Some(vec!["<Control>q".to_string()]),
            kind: ActionKind::QrCode,
        }),
    ];

    let defaults = BTreeMap::from([
        (ItemType::File, "paste-as-path".to_string()),
        (ItemType::Files, "paste-as-path".to_string()),
        (ItemType::Link, "open-with-browser".to_string()),
    ]);

    ActionConfig { actions, defaults }
}
