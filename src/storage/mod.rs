//! Storage layer for clipstash.
//!
//! This module provides SQLite-based persistence for clipboard history:
//! - Connection strings and driver generations
//! - The statement executor, which hides how each generation runs statements
//! - The entry store built on top of it

mod connection;
pub mod driver;
mod entries;
pub mod executor;
mod migrations;
pub mod scheduler;
mod shim;
pub mod statement;
pub mod value;

pub use connection::{Connection, ConnectionSpec, Location, Strategy};
pub use driver::{DriverGeneration, DriverHandle};
pub use entries::{ClearMode, Entries, EntryFilter, EntryStore, History};
pub use scheduler::{Scheduler, TokioScheduler};
pub use statement::{SqlBuilder, Statement, StatementKind};
pub use value::{NonSelect, RowHandle, RowSet, Value};
