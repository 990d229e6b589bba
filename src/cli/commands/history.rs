//! `clipstash history` subcommands.

use std::io::Read;

use crate::cli::args::{AddArgs, HistoryCommands, ListArgs, OutputFormat};
use crate::core::{CodeMetadata, EntryMetadata, EntryUpdate, ItemType, Language, NewEntry};
use crate::error::ClipstashError;
use crate::output::{format_entries, format_entry, to_json};
use crate::storage::{ClearMode, EntryFilter, EntryStore};

/// Execute history subcommands
///
/// # Errors
///
/// Returns an error if a storage operation or output formatting fails.
pub async fn history(
    store: &EntryStore,
    cmd: HistoryCommands,
    format: OutputFormat,
) -> Result<String, ClipstashError> {
    match cmd {
        HistoryCommands::List(args) => {
            let entries = store.list(filter(args)).collect().await?;
            format_entries(&entries, format)
        }
        HistoryCommands::Add(args) => add(store, args, format).await,
        HistoryCommands::Show { id } => {
            let entry = store
                .get(id)
                .await?
                .ok_or_else(|| ClipstashError::NotFound(format!("clipboard entry {id}")))?;
            format_entry(&entry, format)
        }
        HistoryCommands::Tag { id, tag } => {
            let tag = tag.filter(|t| !t.is_empty());
            let message = tag.as_ref().map_or_else(
                || format!("Cleared tag of entry {id}"),
                |t| format!("Tagged entry {id}: #{t}"),
            );
            store
                .update(
                    id,
                    EntryUpdate {
                        tag: Some(tag),
                        ..EntryUpdate::default()
                    },
                )
                .await?;
            Ok(message)
        }
        HistoryCommands::Pin { id, unpin } => {
            store
                .update(
                    id,
                    EntryUpdate {
                        pinned: Some(!unpin),
                        ..EntryUpdate::default()
                    },
                )
                .await?;
            Ok(if unpin {
                format!("Unpinned entry {id}")
            } else {
                format!("Pinned entry {id}")
            })
        }
        HistoryCommands::Delete { id } => {
            store.delete(id).await?;
            Ok(format!("Deleted entry {id}"))
        }
        HistoryCommands::Clear { all } => {
            let mode = if all {
                ClearMode::All
            } else {
                ClearMode::KeepPinnedAndTagged
            };
            let deleted = store.clear(mode).await?;
            match format {
                OutputFormat::Json => to_json(&serde_json::json!({ "deleted": deleted })),
                OutputFormat::Pretty if deleted < 0 => Ok("Cleared history".to_string()),
                OutputFormat::Pretty => Ok(format!("Cleared {deleted} entries")),
            }
        }
    }
}

fn filter(args: ListArgs) -> EntryFilter {
    EntryFilter {
        item_type: args.item_type,
        tag: args.tag,
        search: args.search.filter(|s| !s.is_empty()),
        pinned: args.pinned.then_some(true),
        limit: args.limit,
    }
}

async fn add(
    store: &EntryStore,
    args: AddArgs,
    format: OutputFormat,
) -> Result<String, ClipstashError> {
    let content = match args.content {
        Some(content) => content,
        None => read_stdin()?,
    };
    if content.is_empty() {
        return Err(ClipstashError::Parse("Entry content is empty".to_string()));
    }

    let mut new = NewEntry::new(args.item_type, content);
    new.pinned = args.pinned;
    new.tag = args.tag.filter(|t| !t.is_empty());
    if args.item_type == ItemType::Code {
        let language = args
            .language
            .zip(args.language_name)
            .map(|(id, name)| Language { id, name });
        new.metadata = Some(EntryMetadata::Code(CodeMetadata { language }));
    }

    let entry = store.insert(new).await?;
    match format {
        OutputFormat::Json => to_json(&entry),
        OutputFormat::Pretty => Ok(format!("Stored {} entry {}", entry.item_type, entry.id)),
    }
}

fn read_stdin() -> Result<String, ClipstashError> {
    let mut content = String::new();
    std::io::stdin().read_to_string(&mut content)?;
    if content.ends_with('\n') {
        content.pop();
        if content.ends_with('\r') {
            content.pop();
        }
    }
    Ok(content)
}
