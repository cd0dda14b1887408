//! Error types for the log engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur in the log engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An entry with the same ID is already stored.
    #[error("duplicate log entry id: {id}")]
    DuplicateId {
        /// The rejected identifier.
        id: String,
    },

    /// A batch insert stopped at a duplicate ID partway through.
    #[error("duplicate log entry id: {id} after accepting {accepted} batch entries")]
    BatchDuplicateId {
        /// The rejected identifier.
        id: String,
        /// Entries accepted before the rejection.
        accepted: usize,
    },

    /// A filter's start date is after its end date.
    #[error("invalid filter range: start {start} is after end {end}")]
    InvalidFilterRange {
        /// Start of the requested range.
        start: DateTime<Utc>,
        /// End of the requested range.
        end: DateTime<Utc>,
    },

    /// A required field was not provided.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A string did not name a known log level.
    #[error("unknown log level: {0}")]
    UnknownLevel(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
