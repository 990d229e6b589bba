//! Clipboard entry persistence.
//!
//! The store only speaks to the statement executor and never sees which
//! driver generation is behind the connection. Every write is a single
//! non-select statement; there are no multi-entry transactions, and the last
//! write to an entry wins.

use std::rc::Rc;

use tokio_util::sync::CancellationToken;

use super::connection::{Connection, ConnectionSpec};
use super::driver::DriverGeneration;
use super::migrations;
use super::scheduler::Scheduler;
use super::statement::SqlBuilder;
use super::value::{Row, Value};
use crate::core::{
    format_datetime, parse_datetime, ClipboardEntry, EntryMetadata, EntryUpdate, ItemType,
    NewEntry,
};
use crate::error::ClipstashError;

const TABLE: &str = "clipboard";
const COLUMNS: [&str; 7] = ["id", "type", "content", "pinned", "tag", "datetime", "metadata"];

/// Criteria for listing entries. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub item_type: Option<ItemType>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub pinned: Option<bool>,
    pub limit: Option<usize>,
}

impl EntryFilter {
    #[must_use]
    pub fn of_type(item_type: ItemType) -> Self {
        Self {
            item_type: Some(item_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Which entries survive [`EntryStore::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearMode {
    /// Delete every entry.
    All,
    /// Delete entries that are neither pinned nor tagged.
    #[default]
    KeepPinnedAndTagged,
}

/// Store for clipboard history entries.
#[derive(Debug)]
pub struct EntryStore {
    conn: Connection,
    cancel: CancellationToken,
}

impl EntryStore {
    /// Take ownership of an open connection and bring its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail.
    pub async fn open(conn: Connection) -> Result<Self, ClipstashError> {
        let cancel = CancellationToken::new();
        migrations::run(&conn, &cancel).await?;
        Ok(Self { conn, cancel })
    }

    /// Open the database addressed by `spec` with the given driver generation.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::Connection` if the database cannot be opened,
    /// or an error if migrations fail.
    pub async fn open_spec(
        generation: DriverGeneration,
        spec: &ConnectionSpec,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self, ClipstashError> {
        let conn = Connection::open_spec(generation, spec, scheduler).await?;
        Self::open(conn).await
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Stop watching any statement that is still being polled.
    ///
    /// Later operations on a polling connection resolve to
    /// `ClipstashError::Cancelled`.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Insert a new entry and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or the driver does not report
    /// the inserted row.
    pub async fn insert(&self, entry: NewEntry) -> Result<ClipboardEntry, ClipstashError> {
        let metadata = entry
            .metadata
            .as_ref()
            .map(EntryMetadata::encode)
            .transpose()?;

        let stmt = SqlBuilder::insert(TABLE)
            .value("type", entry.item_type.as_str())
            .value("content", entry.content.as_str())
            .value("pinned", entry.pinned)
            .value("tag", entry.tag.clone())
            .value("datetime", format_datetime(&entry.datetime))
            .value("metadata", metadata)
            .build();

        let result = self.conn.execute_non_select(&stmt, &self.cancel).await?;
        let id = result
            .last_row
            .ok_or_else(|| {
                ClipstashError::Database("Driver did not report the inserted row".to_string())
            })?
            .0;

        tracing::debug!(id, item_type = %entry.item_type, "inserted entry");

        Ok(ClipboardEntry {
            id,
            item_type: entry.item_type,
            content: entry.content,
            pinned: entry.pinned,
            tag: entry.tag,
            // Storage has second precision.
            datetime: parse_datetime(&format_datetime(&entry.datetime)).unwrap_or(entry.datetime),
            metadata: entry.metadata,
        })
    }

    /// Get an entry by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub async fn get(&self, id: i64) -> Result<Option<ClipboardEntry>, ClipstashError> {
        let mut builder = SqlBuilder::select(TABLE);
        for column in COLUMNS {
            builder = builder.field(column);
        }
        let stmt = builder.where_eq("id", id).build();

        let rows = self.conn.execute_select(&stmt, &self.cancel).await?;
        rows.first().map(entry_from_row).transpose()
    }

    /// Change fields of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::NotFound` if no entry has this id.
    pub async fn update(&self, id: i64, update: EntryUpdate) -> Result<(), ClipstashError> {
        if update.is_empty() {
            return match self.get(id).await? {
                Some(_) => Ok(()),
                None => Err(not_found(id)),
            };
        }

        let mut builder = SqlBuilder::update(TABLE);
        if let Some(content) = update.content {
            builder = builder.value("content", content);
        }
        if let Some(pinned) = update.pinned {
            builder = builder.value("pinned", pinned);
        }
        if let Some(tag) = update.tag {
            builder = builder.value("tag", tag);
        }
        if let Some(metadata) = update.metadata {
            let encoded = metadata.as_ref().map(EntryMetadata::encode).transpose()?;
            builder = builder.value("metadata", encoded);
        }
        let stmt = builder.where_eq("id", id).build();

        let result = self.conn.execute_non_select(&stmt, &self.cancel).await?;
        if result.affected_rows == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::NotFound` if no entry has this id.
    pub async fn delete(&self, id: i64) -> Result<(), ClipstashError> {
        let stmt = SqlBuilder::delete(TABLE).where_eq("id", id).build();
        let result = self.conn.execute_non_select(&stmt, &self.cancel).await?;
        if result.affected_rows == 0 {
            return Err(not_found(id));
        }
        tracing::debug!(id, "deleted entry");
        Ok(())
    }

    /// Clear the history.
    ///
    /// Returns the number of deleted entries, or `-2` if the driver does not
    /// report it.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn clear(&self, mode: ClearMode) -> Result<i64, ClipstashError> {
        let mut builder = SqlBuilder::delete(TABLE);
        if mode == ClearMode::KeepPinnedAndTagged {
            builder = builder
                .where_eq("pinned", false)
                .where_eq("tag", Value::Null);
        }
        let result = self
            .conn
            .execute_non_select(&builder.build(), &self.cancel)
            .await?;
        tracing::info!(deleted = result.affected_rows, ?mode, "cleared history");
        Ok(result.affected_rows)
    }

    /// Entries matching `filter`, newest first.
    ///
    /// Nothing is queried until [`History::fetch`] is awaited, and every fetch
    /// queries again.
    #[must_use]
    pub const fn list(&self, filter: EntryFilter) -> History<'_> {
        History {
            store: self,
            filter,
        }
    }
}

fn not_found(id: i64) -> ClipstashError {
    ClipstashError::NotFound(format!("clipboard entry {id}"))
}

fn entry_from_row(row: Row<'_>) -> Result<ClipboardEntry, ClipstashError> {
    let item_type: ItemType = row.text("type")?.parse()?;
    let datetime = row.text("datetime")?;

    Ok(ClipboardEntry {
        id: row.integer("id")?,
        item_type,
        content: row.text("content")?.to_string(),
        pinned: row.integer("pinned")? != 0,
        tag: row.optional_text("tag")?.map(str::to_string),
        datetime: parse_datetime(datetime).ok_or_else(|| {
            ClipstashError::Database(format!("Invalid entry timestamp: {datetime}"))
        })?,
        metadata: row
            .optional_text("metadata")?
            .and_then(|json| EntryMetadata::decode(item_type, json)),
    })
}

/// A restartable listing of entries.
#[derive(Debug)]
pub struct History<'a> {
    store: &'a EntryStore,
    filter: EntryFilter,
}

impl History<'_> {
    /// Run the query and return a lazy iterator over the matching entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn fetch(&self) -> Result<Entries, ClipstashError> {
        let mut builder = SqlBuilder::select(TABLE);
        for column in COLUMNS {
            builder = builder.field(column);
        }
        if let Some(item_type) = self.filter.item_type {
            builder = builder.where_eq("type", item_type.as_str());
        }
        if let Some(tag) = &self.filter.tag {
            builder = builder.where_eq("tag", tag.as_str());
        }
        if let Some(pinned) = self.filter.pinned {
            builder = builder.where_eq("pinned", pinned);
        }
        if let Some(search) = &self.filter.search {
            builder = builder.where_contains("content", search);
        }
        builder = builder.order_by("id", true);
        if let Some(limit) = self.filter.limit {
            builder = builder.limit(limit);
        }

        let rows = self
            .store
            .conn
            .execute_select(&builder.build(), &self.store.cancel)
            .await?;
        let (columns, rows) = rows.into_parts();

        Ok(Entries {
            columns,
            rows: rows.into_iter(),
        })
    }

    /// Run the query and decode every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn collect(&self) -> Result<Vec<ClipboardEntry>, ClipstashError> {
        self.fetch().await?.collect()
    }
}

/// Entries of one query, decoded as they are iterated.
#[derive(Debug)]
pub struct Entries {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

impl Iterator for Entries {
    type Item = Result<ClipboardEntry, ClipstashError>;

    fn next(&mut self) -> Option<Self::Item> {
        let values = self.rows.next()?;
        Some(entry_from_row(Row::new(&self.columns, &values)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::core::{CodeMetadata, Language};
    use crate::storage::scheduler::VirtualScheduler;

    const GENERATIONS: [DriverGeneration; 2] = [DriverGeneration::Legacy, DriverGeneration::Modern];

    async fn open_store(generation: DriverGeneration) -> EntryStore {
        EntryStore::open_spec(
            generation,
            &ConnectionSpec::in_memory(),
            Rc::new(VirtualScheduler::default()),
        )
        .await
        .unwrap()
    }

    fn code_metadata() -> EntryMetadata {
        EntryMetadata::Code(CodeMetadata {
            language: Some(Language {
                id: "rust".to_string(),
                name: "Rust".to_string(),
            }),
        })
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        for generation in GENERATIONS {
            let store = open_store(generation).await;
            let mut new =
                NewEntry::new(ItemType::Code, "fn main() {}").with_metadata(code_metadata());
            new.datetime = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

            let inserted = store.insert(new).await.unwrap();
            let loaded = store.get(inserted.id).await.unwrap().unwrap();

            assert_eq!(loaded, inserted);
            assert_eq!(loaded.tag, None, "{generation}: NULL tag must stay NULL");
            assert_eq!(loaded.metadata, Some(code_metadata()));
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        for generation in GENERATIONS {
            let store = open_store(generation).await;
            assert!(store.get(99).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_quotes_survive_round_trip() {
        for generation in GENERATIONS {
            let store = open_store(generation).await;
            let inserted = store
                .insert(NewEntry::new(ItemType::Text, "it's '''NULL''' here").with_tag("o'clock"))
                .await
                .unwrap();

            let loaded = store.get(inserted.id).await.unwrap().unwrap();
            assert_eq!(loaded.content, "it's '''NULL''' here");
            assert_eq!(loaded.tag.as_deref(), Some("o'clock"));
        }
    }

    #[tokio::test]
    async fn test_null_text_is_stored_as_text() {
        for generation in GENERATIONS {
            let store = open_store(generation).await;
            let inserted = store
                .insert(NewEntry::new(ItemType::Text, "NULL").with_tag("NULL"))
                .await
                .unwrap();

            let loaded = store.get(inserted.id).await.unwrap().unwrap();
            assert_eq!(loaded, inserted, "{generation}");
            assert_eq!(loaded.content, "NULL");
            assert_eq!(loaded.tag.as_deref(), Some("NULL"));

            let filter = EntryFilter {
                tag: Some("NULL".to_string()),
                ..EntryFilter::default()
            };
            let found = store.list(filter).collect().await.unwrap();
            assert_eq!(found.len(), 1, "{generation}: tag filter");
        }
    }

    #[tokio::test]
    async fn test_update_sets_and_clears_tag() {
        for generation in GENERATIONS {
            let store = open_store(generation).await;
            let entry = store
                .insert(NewEntry::new(ItemType::Link, "https://example.com"))
                .await
                .unwrap();

            store
                .update(
                    entry.id,
                    EntryUpdate {
                        tag: Some(Some("docs".to_string())),
                        pinned: Some(true),
                        ..EntryUpdate::default()
                    },
                )
                .await
                .unwrap();
            let loaded = store.get(entry.id).await.unwrap().unwrap();
            assert_eq!(loaded.tag.as_deref(), Some("docs"));
            assert!(loaded.pinned);

            store
                .update(
                    entry.id,
                    EntryUpdate {
                        tag: Some(None),
                        ..EntryUpdate::default()
                    },
                )
                .await
                .unwrap();
            let loaded = store.get(entry.id).await.unwrap().unwrap();
            assert_eq!(loaded.tag, None, "{generation}: cleared tag must be NULL");
        }
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        for generation in GENERATIONS {
            let store = open_store(generation).await;

            let err = store
                .update(
                    42,
                    EntryUpdate {
                        pinned: Some(true),
                        ..EntryUpdate::default()
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ClipstashError::NotFound(_)));

            let err = store.update(42, EntryUpdate::default()).await.unwrap_err();
            assert!(matches!(err, ClipstashError::NotFound(_)));

            let err = store.delete(42).await.unwrap_err();
            assert!(matches!(err, ClipstashError::NotFound(_)));
            assert!(!err.is_storage());
        }
    }

    #[tokio::test]
    async fn test_delete() {
        let store = open_store(DriverGeneration::Modern).await;
        let entry = store
            .insert(NewEntry::new(ItemType::Text, "gone"))
            .await
            .unwrap();

        store.delete(entry.id).await.unwrap();
        assert!(store.get(entry.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_restartable() {
        for generation in GENERATIONS {
            let store = open_store(generation).await;
            store.insert(NewEntry::new(ItemType::Text, "one")).await.unwrap();
            store.insert(NewEntry::new(ItemType::Link, "https://two")).await.unwrap();

            let history = store.list(EntryFilter::default());
            let first: Vec<_> = history.collect().await.unwrap();
            assert_eq!(first.len(), 2);
            assert_eq!(first[0].content, "https://two", "newest first");

            store.insert(NewEntry::new(ItemType::Text, "three")).await.unwrap();
            let second = history.collect().await.unwrap();
            assert_eq!(second.len(), 3);
        }
    }

    #[tokio::test]
    async fn test_list_filters() {
        let store = open_store(DriverGeneration::Legacy).await;
        store.insert(NewEntry::new(ItemType::Text, "plain 100%")).await.unwrap();
        store
            .insert(NewEntry::new(ItemType::Link, "https://a").with_tag("web"))
            .await
            .unwrap();
        store
            .insert(NewEntry::new(ItemType::Link, "https://b").pinned())
            .await
            .unwrap();

        let links = store
            .list(EntryFilter::of_type(ItemType::Link))
            .collect()
            .await
            .unwrap();
        assert_eq!(links.len(), 2);

        let tagged = store
            .list(EntryFilter {
                tag: Some("web".to_string()),
                ..EntryFilter::default()
            })
            .collect()
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].content, "https://a");

        let search = store
            .list(EntryFilter {
                search: Some("0%".to_string()),
                ..EntryFilter::default()
            })
            .collect()
            .await
            .unwrap();
        assert_eq!(search.len(), 1);

        let limited = store
            .list(EntryFilter::default().with_limit(1))
            .collect()
            .await
            .unwrap();
        assert_eq!(limited[0].content, "https://b");
    }

    #[tokio::test]
    async fn test_entries_decode_lazily() {
        let store = open_store(DriverGeneration::Modern).await;
        for i in 0..3 {
            store
                .insert(NewEntry::new(ItemType::Text, format!("entry {i}")))
                .await
                .unwrap();
        }

        let mut entries = store.list(EntryFilter::default()).fetch().await.unwrap();
        assert_eq!(entries.size_hint(), (3, Some(3)));
        assert_eq!(entries.next().unwrap().unwrap().content, "entry 2");
        assert_eq!(entries.size_hint(), (2, Some(2)));
    }

    #[tokio::test]
    async fn test_clear_keeps_pinned_and_tagged() {
        for generation in GENERATIONS {
            let store = open_store(generation).await;
            store.insert(NewEntry::new(ItemType::Text, "a")).await.unwrap();
            store.insert(NewEntry::new(ItemType::Text, "b").pinned()).await.unwrap();
            store
                .insert(NewEntry::new(ItemType::Text, "c").with_tag("keep"))
                .await
                .unwrap();

            assert_eq!(store.clear(ClearMode::KeepPinnedAndTagged).await.unwrap(), 1);
            let rest = store.list(EntryFilter::default()).collect().await.unwrap();
            assert_eq!(rest.len(), 2);
            assert!(rest.iter().all(|e| e.pinned || e.tag.is_some()));

            assert_eq!(store.clear(ClearMode::All).await.unwrap(), 2);
        }
    }

    #[tokio::test]
    async fn test_close_cancels_polling_connection() {
        let store = open_store(DriverGeneration::Legacy).await;
        store.close();

        let err = store.get(1).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
