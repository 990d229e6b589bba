//! Database driver generations.
//!
//! Two driver generations are supported and they expose different execution
//! contracts:
//!
//! - [`PollingDriver`] (legacy): opening is synchronous, statements are
//!   submitted as jobs whose result has to be polled for, and statements can
//!   only be run as rendered SQL text.
//! - [`DirectDriver`] (modern): opening happens from the host loop, statements
//!   run synchronously with bound parameters.
//!
//! A driver is handed to [`Connection::open`](super::Connection::open) as a
//! [`DriverHandle`], whose variant fixes the execution strategy.

mod legacy;
mod modern;
mod sqlite;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::connection::ConnectionSpec;
use super::statement::Statement;
use super::value::{NonSelect, RowSet};
use crate::error::ClipstashError;

pub use legacy::LegacyDriver;
pub use modern::ModernDriver;

/// Error reported by a driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DriverError(pub String);

impl From<rusqlite::Error> for DriverError {
    fn from(e: rusqlite::Error) -> Self {
        Self(e.to_string())
    }
}

/// Identifier of a submitted job.
pub type JobId = u64;

/// What a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rows(RowSet),
    Modified(NonSelect),
}

/// Submit/poll execution contract of the legacy driver generation.
#[cfg_attr(test, mockall::automock)]
pub trait PollingDriver {
    /// Open the database synchronously.
    fn open(&mut self) -> Result<(), DriverError>;

    /// Submit a statement for execution and return its job id.
    fn submit(&self, stmt: &Statement) -> Result<JobId, DriverError>;

    /// Fetch the result of a job, `None` while it is still running.
    fn fetch_result(&self, job: JobId) -> Result<Option<Outcome>, DriverError>;

    /// Render a statement, parameters included, as SQL text.
    fn statement_to_sql(&self, stmt: &Statement) -> String;

    /// Parse SQL text into a statement.
    fn parse_sql(&self, sql: &str) -> Result<Statement, DriverError>;
}

/// Direct execution contract of the modern driver generation.
#[cfg_attr(test, mockall::automock)]
pub trait DirectDriver {
    /// Open the database. Must be called from the host loop.
    fn open(&mut self) -> Result<(), DriverError>;

    /// Execute a statement to completion.
    fn execute(&self, stmt: &Statement) -> Result<Outcome, DriverError>;
}

/// A driver together with the contract it implements.
pub enum DriverHandle {
    Polling(Box<dyn PollingDriver>),
    Direct(Box<dyn DirectDriver>),
}

impl fmt::Debug for DriverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polling(_) => f.write_str("DriverHandle::Polling"),
            Self::Direct(_) => f.write_str("DriverHandle::Direct"),
        }
    }
}

/// Which driver generation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverGeneration {
    /// Job-queue driver with submit/poll execution.
    Legacy,
    /// Direct driver dispatched from the host loop.
    #[default]
    Modern,
}

impl DriverGeneration {
    /// Create an unopened driver of this generation for `spec`.
    #[must_use]
    pub fn connect(self, spec: &ConnectionSpec) -> DriverHandle {
        match self {
            Self::Legacy => DriverHandle::Polling(Box::new(LegacyDriver::new(spec.clone()))),
            Self::Modern => DriverHandle::Direct(Box::new(ModernDriver::new(spec.clone()))),
        }
    }
}

impl fmt::Display for DriverGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Modern => f.write_str("modern"),
        }
    }
}

impl FromStr for DriverGeneration {
    type Err = ClipstashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "modern" => Ok(Self::Modern),
            _ => Err(ClipstashError::Parse(format!("Unknown driver generation: {s}"))),
        }
    }
}
