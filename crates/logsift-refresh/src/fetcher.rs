//! Fetch abstraction between the scheduler and its data source.
//!
//! The scheduler never talks to a store directly; it drives a
//! [`LogFetcher`], so tests can inject slow or failing sources and
//! alternative backends can slot in behind the same seam.

use std::future::Future;
use std::pin::Pin;

use logsift_core::{LogEntry, LogFilter, LogStats, SharedLogStore, aggregate, evaluate};

use crate::error::Result;

/// The result of one fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Entries matching the filter, newest first
    pub entries: Vec<LogEntry>,
    /// Statistics over the whole source, unfiltered
    pub stats: LogStats,
}

/// A source of filtered log data.
pub trait LogFetcher: Send + Sync {
    /// Fetches entries matching the filter plus a statistical summary of
    /// the whole source.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter is invalid or the source fails.
    fn fetch<'a>(
        &'a self,
        filter: &'a LogFilter,
    ) -> Pin<Box<dyn Future<Output = Result<FetchOutcome>> + Send + 'a>>;
}

/// Production fetcher backed by a shared in-memory store.
///
/// Each fetch takes one snapshot of the store, evaluates the filter over
/// it, and aggregates statistics over the same snapshot, so the entry
/// list and the summary always describe the same instant.
#[derive(Debug)]
pub struct StoreFetcher {
    store: SharedLogStore,
}

impl StoreFetcher {
    /// Creates a fetcher over the given store.
    #[must_use]
    pub const fn new(store: SharedLogStore) -> Self {
        Self { store }
    }
}

impl LogFetcher for StoreFetcher {
    fn fetch<'a>(
        &'a self,
        filter: &'a LogFilter,
    ) -> Pin<Box<dyn Future<Output = Result<FetchOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let snapshot = self.store.snapshot();
            let entries = evaluate(&snapshot, filter)?;
            let stats = aggregate(&snapshot);
            Ok(FetchOutcome { entries, stats })
        })
    }
}
