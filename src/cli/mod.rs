//! Command-line interface for clipstash.

pub mod args;
pub mod commands;
