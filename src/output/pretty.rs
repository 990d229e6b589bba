use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;

use super::ActionMatch;
use crate::actions::{Action, ActionConfig, ActionEntry, Invocation};
use crate::core::{format_datetime, ClipboardEntry, EntryMetadata, ItemType};

const PREVIEW_WIDTH: usize = 48;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").unwrap_or_else(|e| panic!("Invalid whitespace regex: {e}")));

/// Single-line preview of entry content.
pub fn preview(content: &str) -> String {
    let flat = WHITESPACE.replace_all(content.trim(), " ");
    if flat.chars().count() <= PREVIEW_WIDTH {
        return flat.into_owned();
    }

    let mut cut: String = flat.chars().take(PREVIEW_WIDTH - 1).collect();
    cut.push('…');
    cut
}

/// Format a list of entries as a pretty table
pub fn format_entries_pretty(entries: &[ClipboardEntry]) -> String {
    if entries.is_empty() {
        return "History (0 entries)\n  No entries".to_string();
    }

    let mut output = format!("History ({} entries)\n", entries.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for entry in entries {
        let pin = if entry.pinned { "*".yellow() } else { " ".normal() };
        let mut line = format!(
            "{:>5} {} {:<9} {}",
            entry.id.to_string().dimmed(),
            pin,
            entry.item_type.as_str().blue(),
            preview(&entry.content)
        );

        if let Some(tag) = &entry.tag {
            line.push_str(&format!("  {}", format!("#{tag}").cyan()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single entry as pretty output
pub fn format_entry_pretty(entry: &ClipboardEntry) -> String {
    let mut output = format!("{} {}\n", "Entry".bold(), entry.id.to_string().bold());
    output.push_str(&format!("  {}: {}\n", "Type".dimmed(), entry.item_type));
    output.push_str(&format!(
        "  {}: {}\n",
        "Copied".dimmed(),
        format_datetime(&entry.datetime)
    ));

    if entry.pinned {
        output.push_str(&format!("  {}: {}\n", "Pinned".dimmed(), "yes".yellow()));
    }

    if let Some(tag) = &entry.tag {
        output.push_str(&format!("  {}: {}\n", "Tag".dimmed(), tag.cyan()));
    }

    if let Some(EntryMetadata::Code(code)) = &entry.metadata {
        let language = code.language.as_ref().map_or("unknown", |l| l.name.as_str());
        output.push_str(&format!("  {}: {}\n", "Language".dimmed(), language));
    }

    output.push_str(&format!("  {}:\n", "Content".dimmed()));
    for line in entry.content.lines() {
        output.push_str(&format!("    {line}\n"));
    }

    output
}

fn describe_action(action: &Action, defaults_for: &[ItemType]) -> String {
    let mut line = format!(
        "{}  {}  {}",
        action.id.bold(),
        action.name,
        format!("[{}]", action.kind.name()).dimmed()
    );

    if let Some(types) = action.types.as_deref().filter(|t| !t.is_empty()) {
        let types = types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        line.push_str(&format!("  {}", types.blue()));
    }

    line.push_str(&format!("  → {}", action.output));

    if !defaults_for.is_empty() {
        let types = defaults_for
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        line.push_str(&format!("  {}", format!("(default for {types})").green()));
    }

    line
}

fn push_tree(output: &mut String, config: &ActionConfig, entries: &[ActionEntry], depth: usize) {
    let indent = "  ".repeat(depth + 1);
    for entry in entries {
        match entry {
            ActionEntry::Submenu(submenu) => {
                output.push_str(&format!("{indent}{}\n", format!("{}/", submenu.name).bold()));
                push_tree(output, config, &submenu.actions, depth + 1);
            }
            ActionEntry::Action(action) => {
                let defaults_for: Vec<ItemType> = config
                    .defaults
                    .iter()
                    .filter(|(_, id)| **id == action.id)
                    .map(|(item_type, _)| *item_type)
                    .collect();
                output.push_str(&format!("{indent}{}\n", describe_action(action, &defaults_for)));
            }
        }
    }
}

/// Format the action tree as pretty output
pub fn format_actions_pretty(config: &ActionConfig) -> String {
    let count = config.leaves().count();
    if count == 0 {
        return "Actions (0)\n  No actions".to_string();
    }

    let mut output = format!("Actions ({count})\n");
    output.push_str(&"─".repeat(60));
    output.push('\n');
    push_tree(&mut output, config, &config.actions, 0);
    output
}

/// Format the actions applicable to an entry as pretty output
pub fn format_matches_pretty(entry: &ClipboardEntry, matches: &[ActionMatch<'_>]) -> String {
    let header = format!(
        "Actions for {} {}",
        entry.item_type.as_str().blue(),
        preview(&entry.content)
    );
    if matches.is_empty() {
        return format!("{header}\n  No applicable actions");
    }

    let mut output = format!("{header}\n");
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for m in matches {
        let marker = if m.is_default { "*".green() } else { " ".normal() };
        output.push_str(&format!(
            "{marker} {}  {}  {}\n",
            m.action.id.bold(),
            m.action.name,
            format!("[{}]", m.action.kind.name()).dimmed()
        ));

        let groups: Vec<String> = m
            .captures
            .iter()
            .skip(1)
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| format!("${}={c}", i + 1)))
            .collect();
        if !groups.is_empty() {
            output.push_str(&format!("    {}\n", groups.join(" ").dimmed()));
        }
    }

    output
}

/// Format a command invocation as pretty output
pub fn format_invocation_pretty(invocation: &Invocation) -> String {
    let mut output = format!("{} {}\n", "Command:".dimmed(), invocation.command);
    for (i, arg) in invocation.args.iter().enumerate() {
        output.push_str(&format!("  {} {arg}\n", format!("${i}:").dimmed()));
    }
    output.push_str(&format!("{} {}", "Output:".dimmed(), invocation.output));
    output
}
