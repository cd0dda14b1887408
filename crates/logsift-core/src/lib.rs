//! # logsift-core
//!
//! In-memory log engine: storage, filtering, statistics, and export.
//!
//! This crate provides:
//!
//! - [`LogEntry`] — Log records with open metadata and tags
//! - [`LogLevel`] — Severity levels (`debug`, `info`, `warning`, `error`)
//! - [`LogStore`] — Append-only storage ordered newest-first
//! - [`LogFilter`] — Strictly conjunctive query criteria
//! - [`evaluate`] — Filter evaluation preserving storage order
//! - [`aggregate`] / [`LogStats`] — Single-pass statistics
//! - [`to_csv`] / [`suggested_filename`] — CSV export
//! - [`SampleLogs`] — Seeded, reproducible sample data
//!
//! ## Example
//!
//! ```rust
//! use logsift_core::{LogEntry, LogFilter, LogLevel, LogStore, aggregate};
//!
//! # fn main() -> logsift_core::Result<()> {
//! let store = LogStore::new();
//! store.insert(
//!     LogEntry::builder()
//!         .id("log-1")
//!         .level(LogLevel::Error)
//!         .source("api-gateway")
//!         .message("upstream timeout")
//!         .build()?,
//! )?;
//!
//! let errors = store.query(&LogFilter::new().with_level(LogLevel::Error))?;
//! let stats = aggregate(&errors);
//! assert_eq!(stats.error_count, 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod export;
pub mod query;
pub mod seed;
pub mod stats;
pub mod store;
pub mod types;

// Re-export main types
pub use error::{EngineError, Result};
pub use export::{CSV_HEADER, csv_field, suggested_filename, to_csv};
pub use query::evaluate;
pub use seed::SampleLogs;
pub use stats::{LogStats, UNKNOWN_ENVIRONMENT, aggregate};
pub use store::{LogStore, SharedLogStore, shared_store};
pub use types::{LogEntry, LogEntryBuilder, LogFilter, LogLevel, keys};
