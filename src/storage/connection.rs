//! Connection strings and the driver capability probe.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

use super::driver::{DirectDriver, DriverGeneration, DriverHandle, PollingDriver};
use super::scheduler::Scheduler;
use crate::error::ClipstashError;

const MEMORY_NAME: &str = ":memory:";

/// Connection string addressing an embedded database.
///
/// The textual form is `DB_DIR=<dir>;DB_NAME=<name>` and addresses the file
/// `<dir>/<name>.db`. `DB_NAME=:memory:` selects a private in-memory database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    dir: PathBuf,
    name: String,
}

/// Where a [`ConnectionSpec`] points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Memory,
    File(PathBuf),
}

impl ConnectionSpec {
    /// Spec for a database file. A trailing `.db` extension is implied.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name
            .strip_suffix(".db")
            .map_or_else(|| file_name.clone(), str::to_string);

        Self { dir, name }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            dir: PathBuf::from("."),
            name: MEMORY_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn location(&self) -> Location {
        if self.name == MEMORY_NAME {
            Location::Memory
        } else {
            Location::File(self.dir.join(format!("{}.db", self.name)))
        }
    }
}

impl fmt::Display for ConnectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DB_DIR={};DB_NAME={}", self.dir.display(), self.name)
    }
}

impl FromStr for ConnectionSpec {
    type Err = ClipstashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dir = None;
        let mut name = None;

        for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                ClipstashError::Parse(format!("Malformed connection string segment: {part}"))
            })?;
            match key.trim().to_uppercase().as_str() {
                "DB_DIR" => dir = Some(PathBuf::from(value.trim())),
                "DB_NAME" => name = Some(value.trim().to_string()),
                other => {
                    return Err(ClipstashError::Parse(format!(
                        "Unknown connection string key: {other}"
                    )))
                }
            }
        }

        let name = name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ClipstashError::Parse("Connection string has no DB_NAME".to_string()))?;

        Ok(Self {
            dir: dir.unwrap_or_else(|| PathBuf::from(".")),
            name,
        })
    }
}

/// Execution strategy fixed when a connection is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Submit a job, then poll for its result.
    SubmitPoll,
    /// Run the statement from a single deferred idle dispatch.
    IdleDispatch,
}

pub(super) enum Backend {
    SubmitPoll(Box<dyn PollingDriver>),
    IdleDispatch(Box<dyn DirectDriver>),
}

/// An open database connection.
///
/// The connection is single-threaded: it is driven from one loop and is not
/// `Send`. Statements are not queued; callers must await one statement before
/// issuing the next.
pub struct Connection {
    pub(super) backend: Backend,
    pub(super) scheduler: Rc<dyn Scheduler>,
}

impl Connection {
    /// Open a driver and fix the execution strategy for the connection's
    /// lifetime.
    ///
    /// A polling driver is opened synchronously. A direct driver is opened
    /// from the next idle dispatch of the scheduler.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::Connection` if the database cannot be opened.
    pub async fn open(
        handle: DriverHandle,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self, ClipstashError> {
        let backend = match handle {
            DriverHandle::Polling(mut driver) => {
                driver
                    .open()
                    .map_err(|e| ClipstashError::Connection(e.to_string()))?;
                Backend::SubmitPoll(driver)
            }
            DriverHandle::Direct(mut driver) => {
                scheduler.idle().await;
                driver
                    .open()
                    .map_err(|e| ClipstashError::Connection(e.to_string()))?;
                Backend::IdleDispatch(driver)
            }
        };

        let connection = Self { backend, scheduler };
        tracing::debug!(strategy = ?connection.strategy(), "opened connection");
        Ok(connection)
    }

    /// Open `spec` with a driver of the given generation.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::Connection` if the database cannot be opened.
    pub async fn open_spec(
        generation: DriverGeneration,
        spec: &ConnectionSpec,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self, ClipstashError> {
        if let Location::File(path) = spec.location() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ClipstashError::Connection(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Self::open(generation.connect(spec), scheduler).await
    }

    /// The strategy chosen at open time.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self.backend {
            Backend::SubmitPoll(_) => Strategy::SubmitPoll,
            Backend::IdleDispatch(_) => Strategy::IdleDispatch,
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("strategy", &self.strategy())
            .finish_non_exhaustive()
    }
}
