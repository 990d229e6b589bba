use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClipstashError;

/// Classification of clipboard content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Text,
    Code,
    Link,
    Character,
    Color,
    Image,
    File,
    Files,
}

impl ItemType {
    pub const ALL: [Self; 8] = [
        Self::Text,
        Self::Code,
        Self::Link,
        Self::Character,
        Self::Color,
        Self::Image,
        Self::File,
        Self::Files,
    ];

    /// The tag stored in the database and used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
            Self::Link => "link",
            Self::Character => "character",
            Self::Color => "color",
            Self::Image => "image",
            Self::File => "file",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ClipstashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ClipstashError::Parse(format!("Unknown item type: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetadata {
    #[serde(default)]
    pub language: Option<Language>,
}

/// Per-type metadata attached to an entry.
///
/// Only code entries carry metadata today. The variant is chosen from the
/// entry's item type when reading, so the stored JSON is untagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryMetadata {
    Code(CodeMetadata),
}

impl EntryMetadata {
    /// Decode stored metadata JSON for an entry of the given type.
    ///
    /// Types without metadata yield `None`. Undecodable metadata is dropped
    /// rather than failing the whole row.
    #[must_use]
    pub fn decode(item_type: ItemType, json: &str) -> Option<Self> {
        match item_type {
            ItemType::Code => serde_json::from_str::<CodeMetadata>(json)
                .map(Self::Code)
                .map_err(|e| tracing::debug!("ignoring malformed code metadata: {e}"))
                .ok(),
            _ => None,
        }
    }

    /// Encode metadata for storage.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::Parse` if serialization fails.
    pub fn encode(&self) -> Result<String, ClipstashError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A stored clipboard history entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipboardEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub content: String,
    pub pinned: bool,
    pub tag: Option<String>,
    pub datetime: DateTime<Utc>,
    pub metadata: Option<EntryMetadata>,
}

impl ClipboardEntry {
    /// Build an in-memory entry, mostly useful for matching without a store.
    #[must_use]
    pub fn transient(item_type: ItemType, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            item_type,
            content: content.into(),
            pinned: false,
            tag: None,
            datetime: Utc::now(),
            metadata: None,
        }
    }
}

/// Fields for a new entry. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub item_type: ItemType,
    pub content: String,
    pub pinned: bool,
    pub tag: Option<String>,
    pub datetime: DateTime<Utc>,
    pub metadata: Option<EntryMetadata>,
}

impl NewEntry {
    /// Create a new unpinned, untagged entry observed now.
    #[must_use]
    pub fn new(item_type: ItemType, content: impl Into<String>) -> Self {
        Self {
            item_type,
            content: content.into(),
            pinned: false,
            tag: None,
            datetime: Utc::now(),
            metadata: None,
        }
    }

    /// Attach a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Attach metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: EntryMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Mark as pinned.
    #[must_use]
    pub const fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}

/// Fields to change on an existing entry.
///
/// `None` leaves a field untouched; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub content: Option<String>,
    pub pinned: Option<bool>,
    pub tag: Option<Option<String>>,
    pub metadata: Option<Option<EntryMetadata>>,
}

impl EntryUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.pinned.is_none()
            && self.tag.is_none()
            && self.metadata.is_none()
    }
}
