//! `clipstash actions` subcommands.

use std::path::PathBuf;

use super::Context;
use crate::actions::{
    bundled, find_action_by_id, is_default_action, load_config, match_action, plan, save_config,
    upgrade_config, ActionConfig, ConfigSource, Plan,
};
use crate::actions::file::load_from_source;
use crate::cli::args::{ActionsCommands, EntryTarget, OutputFormat};
use crate::core::ClipboardEntry;
use crate::error::ClipstashError;
use crate::output::{format_actions, format_invocation, format_matches, to_json, ActionMatch};

/// Execute actions subcommands
///
/// # Errors
///
/// Returns an error if the entry or action cannot be found, a command fails,
/// or the configuration cannot be saved.
pub async fn actions(ctx: &Context, cmd: ActionsCommands) -> Result<String, ClipstashError> {
    let source = ConfigSource::from_env(&ctx.paths.actions_file);

    match cmd {
        ActionsCommands::List => {
            format_actions(&load_config(&ctx.paths.actions_file, true), ctx.format)
        }
        ActionsCommands::Match(target) => {
            let config = load_config(&ctx.paths.actions_file, true);
            let entry = resolve_target(ctx, target).await?;
            let matches = applicable(&config, &entry);
            format_matches(&entry, &matches, ctx.format)
        }
        ActionsCommands::Run {
            action,
            target,
            dry_run,
        } => {
            let config = load_config(&ctx.paths.actions_file, true);
            let action = find_action_by_id(&config, &action)
                .ok_or_else(|| ClipstashError::NotFound(format!("action '{action}'")))?;
            let entry = resolve_target(ctx, target).await?;

            match plan(&entry, action)? {
                Plan::Command(invocation) if dry_run => format_invocation(&invocation, ctx.format),
                Plan::Command(invocation) => {
                    let result = invocation.run()?;
                    match ctx.format {
                        OutputFormat::Json => to_json(&serde_json::json!({
                            "action": action.id,
                            "output": result.output,
                            "stdout": result.stdout,
                        })),
                        OutputFormat::Pretty => {
                            Ok(result.stdout.trim_end_matches('\n').to_string())
                        }
                    }
                }
                Plan::Builtin { kind, output } => match ctx.format {
                    OutputFormat::Json => to_json(&serde_json::json!({
                        "action": action.id,
                        "builtin": kind,
                        "output": output,
                    })),
                    OutputFormat::Pretty => Ok(format!(
                        "'{}' is a built-in {kind} action handled by the clipboard manager",
                        action.id
                    )),
                },
            }
        }
        ActionsCommands::Upgrade { dry_run } => upgrade(&source, dry_run, ctx.format),
        ActionsCommands::Path => Ok(match source {
            ConfigSource::Bundled => "bundled (CLIPSTASH_ACTIONS=default)".to_string(),
            ConfigSource::File(path) => path.display().to_string(),
        }),
    }
}

fn applicable<'a>(config: &'a ActionConfig, entry: &ClipboardEntry) -> Vec<ActionMatch<'a>> {
    config
        .leaves()
        .filter_map(|action| {
            match_action(entry, action).map(|captures| ActionMatch {
                action,
                is_default: is_default_action(config, entry, action),
                captures,
            })
        })
        .collect()
}

async fn resolve_target(
    ctx: &Context,
    target: EntryTarget,
) -> Result<ClipboardEntry, ClipstashError> {
    match (target.id, target.content) {
        (_, Some(content)) => Ok(ClipboardEntry::transient(target.item_type, content)),
        (Some(id), None) => {
            let store = ctx.open_store().await?;
            store
                .get(id)
                .await?
                .ok_or_else(|| ClipstashError::NotFound(format!("clipboard entry {id}")))
        }
        (None, None) => Err(ClipstashError::Parse(
            "Give an entry id or --content".to_string(),
        )),
    }
}

fn upgrade(
    source: &ConfigSource,
    dry_run: bool,
    format: OutputFormat,
) -> Result<String, ClipstashError> {
    let path: PathBuf = match source {
        ConfigSource::Bundled => {
            return Ok("Using the bundled actions; nothing to upgrade".to_string());
        }
        ConfigSource::File(path) => path.clone(),
    };

    let user = load_from_source(source, false);
    let Some((merged, added)) = upgrade_config(&user, &bundled()) else {
        return match format {
            OutputFormat::Json => to_json(&serde_json::json!({ "added": 0 })),
            OutputFormat::Pretty => Ok("Actions are up to date".to_string()),
        };
    };

    if !dry_run {
        save_config(&path, &merged, true)?;
    }

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "added": added,
            "saved": !dry_run,
            "path": path,
        })),
        OutputFormat::Pretty if dry_run => {
            Ok(format!("Would add {added} actions to {}", path.display()))
        }
        OutputFormat::Pretty => Ok(format!("Added {added} actions to {}", path.display())),
    }
}
