//! Database migrations for clipstash.
//!
//! Each migration upgrades the schema by one version. Migrations run through
//! the statement executor when the entry store is opened, so they behave the
//! same on both driver generations.

use tokio_util::sync::CancellationToken;

use super::connection::Connection;
use super::statement::{Statement, StatementKind};
use super::value::Value;
use crate::error::ClipstashError;

/// Current schema version.
pub const CURRENT_VERSION: i64 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub async fn get_version(
    conn: &Connection,
    token: &CancellationToken,
) -> Result<i64, ClipstashError> {
    let stmt = Statement::new(StatementKind::Select, "PRAGMA user_version");
    let rows = conn.execute_select(&stmt, token).await?;

    rows.first()
        .and_then(|row| row.get("user_version").and_then(Value::as_i64))
        .ok_or_else(|| ClipstashError::Database("Failed to get schema version".to_string()))
}

async fn set_version(
    conn: &Connection,
    version: i64,
    token: &CancellationToken,
) -> Result<(), ClipstashError> {
    let stmt = Statement::new(
        StatementKind::NonSelect,
        format!("PRAGMA user_version = {version}"),
    );
    conn.execute_non_select(&stmt, token).await?;
    Ok(())
}

/// Run all pending migrations.
pub async fn run(conn: &Connection, token: &CancellationToken) -> Result<(), ClipstashError> {
    let current = get_version(conn, token).await?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        for sql in migration(version)? {
            let stmt = Statement::new(StatementKind::NonSelect, *sql);
            conn.execute_non_select(&stmt, token)
                .await
                .map_err(|e| match e {
                    ClipstashError::Query(msg) => {
                        ClipstashError::Database(format!("Migration v{version} failed: {msg}"))
                    }
                    other => other,
                })?;
        }
        set_version(conn, version, token).await?;
        tracing::info!(version, "applied schema migration");
    }

    Ok(())
}

/// Statements of a specific migration, one statement per entry.
fn migration(version: i64) -> Result<&'static [&'static str], ClipstashError> {
    match version {
        1 => Ok(MIGRATE_V1),
        _ => Err(ClipstashError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: clipboard history table.
const MIGRATE_V1: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS clipboard (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL,
        content TEXT NOT NULL,
        pinned INTEGER NOT NULL DEFAULT 0,
        tag TEXT,
        datetime TEXT NOT NULL,
        metadata TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_clipboard_type ON clipboard(type)",
    "CREATE INDEX IF NOT EXISTS idx_clipboard_datetime ON clipboard(datetime)",
];
