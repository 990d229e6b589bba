//! Core clipboard types shared by the store and the action engine.

mod datetime;
mod types;

pub use datetime::{format_datetime, parse_datetime};
pub use types::{
    ClipboardEntry, CodeMetadata, EntryMetadata, EntryUpdate, ItemType, Language, NewEntry,
};
