//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::ClipstashError;

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns `ClipstashError::Parse` if the generated script is not UTF-8.
pub fn completions(shell: Shell) -> Result<String, ClipstashError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "clipstash", &mut buf);
    String::from_utf8(buf).map_err(|e| ClipstashError::Parse(format!("UTF-8 error: {e}")))
}
