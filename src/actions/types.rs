//! Action configuration document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ItemType;

/// Root of an action configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Display order is merge-join order.
    pub actions: Vec<ActionEntry>,
    /// Item type to default action id. The id may no longer exist.
    #[serde(default)]
    pub defaults: BTreeMap<ItemType, String>,
}

impl ActionConfig {
    /// Every action of the tree, depth-first.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(&self.actions)
    }
}

/// An entry of an action list: either a named submenu or an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionEntry {
    Submenu(ActionSubmenu),
    Action(Action),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSubmenu {
    pub name: String,
    pub actions: Vec<ActionEntry>,
}

/// A user-visible action applicable to clipboard entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub name: String,
    /// Regular expression searched in the entry content.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Item types the action applies to.
    #[serde(default)]
    pub types: Option<Vec<ItemType>>,
    pub output: ActionOutput,
    #[serde(default)]
    pub shortcut: Option<Vec<String>>,
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl Action {
    /// The pattern, if it restricts content at all.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether the action accepts entries of `item_type`.
    #[must_use]
    pub fn accepts(&self, item_type: ItemType) -> bool {
        self.types
            .as_deref()
            .map_or(true, |types| types.is_empty() || types.contains(&item_type))
    }
}

/// Kind-specific part of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionKind {
    /// Shell command template; `$1`.. are capture groups.
    Command { command: String },
    /// Convert a color to another color space.
    Color { space: ColorSpace },
    /// Show the content as a QR code.
    QrCode,
}

impl ActionKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Command { .. } => "command",
            Self::Color { .. } => "color",
            Self::QrCode => "qrcode",
        }
    }
}

/// What happens to the result of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionOutput {
    Ignore,
    Copy,
    Paste,
}

impl fmt::Display for ActionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ignore => "ignore",
            Self::Copy => "copy",
            Self::Paste => "paste",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSpace {
    Rgb,
    Hex,
    Hsl,
    Hwb,
    LinearRgb,
    Xyz,
    Lab,
    Lch,
    Oklab,
    Oklch,
}

/// Depth-first iterator over the actions of a tree.
///
/// Children of a submenu are visited before the submenu's later siblings.
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, ActionEntry>>,
}

impl<'a> Leaves<'a> {
    #[must_use]
    pub fn new(entries: &'a [ActionEntry]) -> Self {
        Self {
            stack: vec![entries.iter()],
        }
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Action;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(ActionEntry::Action(action)) => return Some(action),
                Some(ActionEntry::Submenu(submenu)) => self.stack.push(submenu.actions.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_action() {
        let json = r#"{
            "kind": "command",
            "id": "open-with-browser",
            "name": "Open with Browser",
            "pattern": null,
            "types": ["link"],
            "command": "xargs xdg-open",
            "output": "ignore",
            "shortcut": []
        }"#;

        let entry: ActionEntry = serde_json::from_str(json).unwrap();
        let ActionEntry::Action(action) = entry else {
            panic!("expected an action");
        };
        assert_eq!(action.id, "open-with-browser");
        assert_eq!(action.pattern(), None);
        assert_eq!(
            action.kind,
            ActionKind::Command {
                command: "xargs xdg-open".to_string()
            }
        );
    }

    #[test]
    fn test_parse_submenu_and_color() {
        let json = r#"{
            "name": "Convert",
            "actions": [
                {"kind": "color", "id": "lrgb", "name": "Linear", "space": "linear-rgb",
                 "types": ["color"], "output": "paste"}
            ]
        }"#;

        let entry: ActionEntry = serde_json::from_str(json).unwrap();
        let ActionEntry::Submenu(submenu) = entry else {
            panic!("expected a submenu");
        };
        assert_eq!(submenu.name, "Convert");
        let ActionEntry::Action(action) = &submenu.actions[0] else {
            panic!("expected an action");
        };
        assert_eq!(
            action.kind,
            ActionKind::Color {
                space: ColorSpace::LinearRgb
            }
        );
        assert_eq!(action.shortcut, None);
    }

    #[test]
    fn test_missing_defaults() {
        let config: ActionConfig = serde_json::from_str(r#"{"actions": []}"#).unwrap();
        assert!(config.defaults.is_empty());
    }

    #[test]
    fn test_serialize_uses_kind_tag() {
        let action = Action {
            id: "qrcode".to_string(),
            name: "QR Code".to_string(),
            pattern: None,
            types: None,
            output: ActionOutput::Ignore,
            shortcut: Some(vec!["<Control>q".to_string()]),
            kind: ActionKind::QrCode,
        };

        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["kind"], "qrcode");
        assert_eq!(value["pattern"], serde_json::Value::Null);
    }

    #[test]
    fn test_empty_pattern_and_types_match_anything() {
        let action = Action {
            id: "a".to_string(),
            name: "A".to_string(),
            pattern: Some(String::new()),
            types: Some(Vec::new()),
            output: ActionOutput::Copy,
            shortcut: None,
            kind: ActionKind::QrCode,
        };

        assert_eq!(action.pattern(), None);
        assert!(ItemType::ALL.iter().all(|t| action.accepts(*t)));
    }

    #[test]
    fn test_leaves_depth_first() {
        let json = r#"{"actions": [
            {"kind": "qrcode", "id": "a", "name": "A", "output": "ignore"},
            {"name": "outer", "actions": [
                {"name": "inner", "actions": [
                    {"kind": "qrcode", "id": "b", "name": "B", "output": "ignore"}
                ]},
                {"kind": "qrcode", "id": "c", "name": "C", "output": "ignore"}
            ]},
            {"kind": "qrcode", "id": "d", "name": "D", "output": "ignore"}
        ]}"#;
        let config: ActionConfig = serde_json::from_str(json).unwrap();

        let ids: Vec<_> = config.leaves().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }
}
