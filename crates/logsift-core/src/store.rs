//! In-memory log storage ordered newest-first.
//!
//! This module provides:
//! - [`LogStore`] — Thread-safe, append-only storage sorted by timestamp
//!   descending
//! - [`SharedLogStore`] — Shared handle for concurrent producers and readers

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::types::{LogEntry, LogFilter};

/// Thread-safe in-memory log store.
///
/// Entries are kept sorted by timestamp descending (newest first) at all
/// times, so reads never sort. Entries are never mutated or deleted once
/// accepted, and IDs are unique across the store's lifetime.
#[derive(Debug, Default)]
pub struct LogStore {
    /// All entries, sorted by timestamp descending
    entries: RwLock<Vec<LogEntry>>,
    /// Every ID ever accepted
    ids: RwLock<HashSet<String>>,
}

impl LogStore {
    /// Creates a new empty log store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry at its timestamp-ordered position.
    ///
    /// The position is found by binary search over the descending order;
    /// an entry with a timestamp equal to existing entries lands after
    /// them, so insertion order is preserved among equals.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateId`] if an entry with the same ID
    /// was already accepted. The store is left unchanged in that case.
    #[allow(clippy::significant_drop_tightening)]
    pub fn insert(&self, entry: LogEntry) -> Result<()> {
        let mut entries = self.entries.write();
        let mut ids = self.ids.write();

        if !ids.insert(entry.id.clone()) {
            warn!(id = %entry.id, "rejected duplicate log entry");
            return Err(EngineError::DuplicateId { id: entry.id });
        }

        let idx = entries.partition_point(|e| e.timestamp >= entry.timestamp);
        debug!(id = %entry.id, index = idx, "log entry inserted");
        entries.insert(idx, entry);

        Ok(())
    }

    /// Inserts a batch of entries, stopping at the first duplicate.
    ///
    /// Entries accepted before the duplicate remain inserted; the error
    /// reports how many.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BatchDuplicateId`] naming the first
    /// rejected entry and the number accepted before it.
    pub fn insert_batch(&self, batch: Vec<LogEntry>) -> Result<usize> {
        let mut accepted = 0;
        for entry in batch {
            match self.insert(entry) {
                Ok(()) => accepted += 1,
                Err(EngineError::DuplicateId { id }) => {
                    return Err(EngineError::BatchDuplicateId { id, accepted });
                }
                Err(other) => return Err(other),
            }
        }
        Ok(accepted)
    }

    /// Returns a read-only copy of all entries in storage order
    /// (newest first).
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    /// Evaluates a filter against the current contents.
    ///
    /// Results preserve storage order, so they arrive newest first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFilterRange`] if the filter's start
    /// date is after its end date.
    pub fn query(&self, filter: &LogFilter) -> Result<Vec<LogEntry>> {
        let entries = self.entries.read();
        crate::query::evaluate(&entries, filter)
    }

    /// Gets a specific entry by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<LogEntry> {
        self.entries.read().iter().find(|e| e.id == id).cloned()
    }

    /// Returns true if an entry with the given ID was accepted.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.read().contains(id)
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Shared log store handle.
pub type SharedLogStore = Arc<LogStore>;

/// Creates a new shared log store.
#[must_use]
pub fn shared_store() -> SharedLogStore {
    Arc::new(LogStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn make_entry(id: &str, level: LogLevel, at: DateTime<Utc>) -> LogEntry {
        LogEntry::builder()
            .id(id)
            .timestamp(at)
            .level(level)
            .source("api-gateway")
            .message(format!("event {id}"))
            .build()
            .expect("entry should build")
    }

    #[test]
    fn insert_keeps_newest_first() {
        let store = LogStore::new();

        store
            .insert(make_entry("b", LogLevel::Info, ts(1)))
            .expect("insert b");
        store
            .insert(make_entry("a", LogLevel::Error, ts(3)))
            .expect("insert a");
        store
            .insert(make_entry("c", LogLevel::Warning, ts(2)))
            .expect("insert c");

        let snapshot = store.snapshot();
        let ids: Vec<&str> = snapshot.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn insert_rejects_duplicate_id_and_leaves_store_unchanged() {
        let store = LogStore::new();
        store
            .insert(make_entry("log-1", LogLevel::Info, ts(1)))
            .expect("first insert");

        let before = store.snapshot();
        let result = store.insert(make_entry("log-1", LogLevel::Error, ts(5)));

        assert!(matches!(
            result,
            Err(EngineError::DuplicateId { ref id }) if id == "log-1"
        ));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_equal_timestamps_keeps_insertion_order() {
        let store = LogStore::new();
        let at = ts(4);

        for id in ["first", "second", "third"] {
            store
                .insert(make_entry(id, LogLevel::Info, at))
                .expect("insert");
        }

        let ids: Vec<String> = store.snapshot().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn insert_batch_counts_accepted() {
        let store = LogStore::new();
        let batch = vec![
            make_entry("a", LogLevel::Info, ts(1)),
            make_entry("b", LogLevel::Info, ts(2)),
            make_entry("c", LogLevel::Info, ts(3)),
        ];

        let accepted = store.insert_batch(batch).expect("batch insert");
        assert_eq!(accepted, 3);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn insert_batch_stops_at_first_duplicate() {
        let store = LogStore::new();
        let batch = vec![
            make_entry("a", LogLevel::Info, ts(1)),
            make_entry("a", LogLevel::Info, ts(2)),
            make_entry("c", LogLevel::Info, ts(3)),
        ];

        let result = store.insert_batch(batch);
        assert!(matches!(
            result,
            Err(EngineError::BatchDuplicateId { ref id, accepted: 1 }) if id == "a"
        ));
        // The entry before the duplicate stays; the one after was never tried.
        assert_eq!(store.len(), 1);
        assert!(store.contains("a"));
        assert!(!store.contains("c"));
    }

    #[test]
    fn get_by_id() {
        let store = LogStore::new();
        store
            .insert(make_entry("log-7", LogLevel::Warning, ts(2)))
            .expect("insert");

        let found = store.get("log-7");
        assert_eq!(found.map(|e| e.level), Some(LogLevel::Warning));
        assert!(store.get("log-8").is_none());
    }

    #[test]
    fn len_and_is_empty() {
        let store = LogStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);

        store
            .insert(make_entry("a", LogLevel::Info, ts(1)))
            .expect("insert");
        assert!(!store.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn query_preserves_storage_order() {
        let store = LogStore::new();
        store
            .insert(make_entry("old", LogLevel::Error, ts(1)))
            .expect("insert");
        store
            .insert(make_entry("new", LogLevel::Error, ts(9)))
            .expect("insert");
        store
            .insert(make_entry("mid", LogLevel::Info, ts(5)))
            .expect("insert");

        let results = store
            .query(&LogFilter::new().with_level(LogLevel::Error))
            .expect("query");
        let ids: Vec<&str> = results.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn query_rejects_inverted_range() {
        let store = LogStore::new();
        let filter = LogFilter::new()
            .with_start_date(ts(5))
            .with_end_date(ts(1));

        assert!(matches!(
            store.query(&filter),
            Err(EngineError::InvalidFilterRange { .. })
        ));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let store = LogStore::new();
        store
            .insert(make_entry("a", LogLevel::Info, ts(1)))
            .expect("insert");

        let mut snapshot = store.snapshot();
        snapshot.clear();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn shared_store_works_across_clones() {
        let store = shared_store();
        let store2 = Arc::clone(&store);

        store
            .insert(make_entry("a", LogLevel::Info, ts(1)))
            .expect("insert");
        store2
            .insert(make_entry("b", LogLevel::Info, ts(2)))
            .expect("insert");

        assert_eq!(store.len(), 2);
    }

    proptest! {
        #[test]
        fn adjacent_entries_are_timestamp_descending(
            offsets in proptest::collection::vec(0i64..86_400, 1..60)
        ) {
            let store = LogStore::new();
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

            for (i, off) in offsets.iter().enumerate() {
                let entry = LogEntry::builder()
                    .id(format!("log-{i}"))
                    .timestamp(base + chrono::Duration::seconds(*off))
                    .source("proptest")
                    .message("generated")
                    .build()
                    .expect("entry should build");
                store.insert(entry).expect("insert");
            }

            let snapshot = store.snapshot();
            prop_assert_eq!(snapshot.len(), offsets.len());
            for pair in snapshot.windows(2) {
                prop_assert!(pair[0].timestamp >= pair[1].timestamp);
            }
        }
    }
}
