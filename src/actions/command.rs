//! Running actions against an entry.

use std::io::Write;
use std::process::{Command, Stdio};

use super::matcher::match_action;
use super::types::{Action, ActionKind, ActionOutput};
use crate::core::ClipboardEntry;
use crate::error::ClipstashError;

const SHELL: &str = "sh";

/// How an applicable action is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Run a shell command.
    Command(Invocation),
    /// Handled by the clipboard manager itself (color conversion, QR code).
    Builtin { kind: &'static str, output: ActionOutput },
}

/// A shell command ready to run.
///
/// The command is run as `sh -c <command> <captures>...`, so `$0` is the
/// whole match and `$1`.. are the capture groups. The entry content is
/// written to its standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    pub input: String,
    pub output: ActionOutput,
}

/// What a command printed and what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub output: ActionOutput,
    pub stdout: String,
}

/// Work out how `action` would run on `entry`.
///
/// # Errors
///
/// Returns `ClipstashError::Command` if the action does not apply to the
/// entry.
pub fn plan(entry: &ClipboardEntry, action: &Action) -> Result<Plan, ClipstashError> {
    let captures = match_action(entry, action).ok_or_else(|| {
        ClipstashError::Command(format!(
            "Action '{}' does not apply to this {} entry",
            action.id, entry.item_type
        ))
    })?;

    Ok(match &action.kind {
        ActionKind::Command { command } => Plan::Command(Invocation {
            command: command.clone(),
            args: captures.into_iter().map(Option::unwrap_or_default).collect(),
            input: entry.content.clone(),
            output: action.output,
        }),
        kind @ (ActionKind::Color { .. } | ActionKind::QrCode) => Plan::Builtin {
            kind: kind.name(),
            output: action.output,
        },
    })
}

impl Invocation {
    /// Run the command and collect its standard output.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::Command` if the shell cannot be started or the
    /// command exits unsuccessfully.
    pub fn run(&self) -> Result<ActionResult, ClipstashError> {
        tracing::debug!(command = %self.command, args = ?self.args, "running action command");

        let mut child = Command::new(SHELL)
            .arg("-c")
            .arg(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClipstashError::Command(format!("Failed to start {SHELL}: {e}")))?;

        // Stdin is fed concurrently with reading stdout.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = self.input.clone();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| ClipstashError::Command(format!("Failed to wait for command: {e}")))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {},
                // The command may exit without reading its input.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {},
                Ok(Err(e)) => return Err(ClipstashError::Io(e)),
                Err(_) => {
                    return Err(ClipstashError::Command(
                        "Input writer panicked".to_string(),
                    ))
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipstashError::Command(format!(
                "'{}' failed ({}): {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(ActionResult {
            output: self.output,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::defaults::bundled;
    use crate::actions::resolver::find_action_by_id;
    use crate::core::ItemType;

    fn command_action(pattern: Option<&str>, command: &str) -> Action {
        Action {
            id: "cmd".to_string(),
            name: "Cmd".to_string(),
            pattern: pattern.map(str::to_string),
            types: None,
            output: ActionOutput::Copy,
            shortcut: None,
            kind: ActionKind::Command {
                command: command.to_string(),
            },
        }
    }

    #[test]
    fn test_plan_passes_captures() {
        let entry = ClipboardEntry::transient(ItemType::Text, "key=value");
        let action = command_action(Some("(\\w+)=(x)?"), "echo $1");

        let Plan::Command(invocation) = plan(&entry, &action).unwrap() else {
            panic!("expected a command");
        };
        assert_eq!(invocation.args, ["key=", "key", ""]);
        assert_eq!(invocation.input, "key=value");
        assert_eq!(invocation.output, ActionOutput::Copy);
    }

    #[test]
    fn test_plan_builtin() {
        let config = bundled();
        let qrcode = find_action_by_id(&config, "qrcode").unwrap();
        let entry = ClipboardEntry::transient(ItemType::Text, "hello");

        assert_eq!(
            plan(&entry, qrcode).unwrap(),
            Plan::Builtin {
                kind: "qrcode",
                output: ActionOutput::Ignore
            }
        );
    }

    #[test]
    fn test_plan_not_applicable() {
        let config = bundled();
        let browser = find_action_by_id(&config, "open-with-browser").unwrap();
        let entry = ClipboardEntry::transient(ItemType::Text, "hello");

        let err = plan(&entry, browser).unwrap_err();
        assert!(matches!(err, ClipstashError::Command(_)));
    }

    #[test]
    fn test_run_positional_captures() {
        let entry = ClipboardEntry::transient(ItemType::Text, "user@example.com");
        let action = command_action(Some("^([^@]+)@(.+)$"), "printf '%s at %s' \"$1\" \"$2\"");

        let Plan::Command(invocation) = plan(&entry, &action).unwrap() else {
            panic!("expected a command");
        };
        let result = invocation.run().unwrap();

        assert_eq!(result.stdout, "user at example.com");
        assert_eq!(result.output, ActionOutput::Copy);
    }

    #[test]
    fn test_run_reads_content_from_stdin() {
        let config = bundled();
        let paste = find_action_by_id(&config, "paste-as-path").unwrap();
        let entry = ClipboardEntry::transient(ItemType::File, "file:///tmp/report.pdf");

        let Plan::Command(invocation) = plan(&entry, paste).unwrap() else {
            panic!("expected a command");
        };
        let result = invocation.run().unwrap();

        assert_eq!(result.stdout.trim_end(), "/tmp/report.pdf");
        assert_eq!(result.output, ActionOutput::Paste);
    }

    #[test]
    fn test_run_failure() {
        let entry = ClipboardEntry::transient(ItemType::Text, "x");
        let action = command_action(None, "echo oops >&2; exit 3");

        let Plan::Command(invocation) = plan(&entry, &action).unwrap() else {
            panic!("expected a command");
        };
        let err = invocation.run().unwrap_err();

        assert!(err.to_string().contains("oops"));
    }
}
