//! Error types for clipstash.

use thiserror::Error;

/// Errors produced by the store, the action engine and the CLI.
#[derive(Debug, Error)]
pub enum ClipstashError {
    /// The database could not be opened or created.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement failed or was executed as the wrong kind.
    #[error("Query error: {0}")]
    Query(String),

    /// The poll budget ran out before the driver produced a result.
    #[error("Timed out waiting for statement result after {0} attempts")]
    Timeout(u32),

    /// The caller stopped watching a statement. Not a failure.
    #[error("Operation cancelled")]
    Cancelled,

    /// A clipboard entry or action does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Schema or row conversion problem.
    #[error("Database error: {0}")]
    Database(String),

    /// Settings or action configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An action command could not be run.
    #[error("Command error: {0}")]
    Command(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClipstashError {
    /// Whether this error is the cancellation marker rather than a failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether this error came from the storage transport (as opposed to a
    /// missing entry or a configuration problem).
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Query(_) | Self::Timeout(_) | Self::Database(_)
        )
    }
}

impl From<serde_json::Error> for ClipstashError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for ClipstashError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
