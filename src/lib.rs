//! clipstash - clipboard history store and action engine
//!
//! This crate persists clipboard history over two generations of an embedded
//! SQLite driver and decides which user-defined actions apply to each entry.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::ClipstashError;
pub use storage::{EntryStore, EntryFilter};
