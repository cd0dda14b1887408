//! Core types for the log engine.
//!
//! This module provides:
//! - [`LogLevel`] — Severity levels for log entries
//! - [`LogEntry`] — A single log record with open metadata
//! - [`LogFilter`] — Conjunctive query criteria
//! - [`keys`] — Metadata keys the engine recognizes

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Metadata keys the engine recognizes on [`LogEntry`].
///
/// The metadata map is open: producers may attach arbitrary keys, and
/// unrecognized keys are preserved untouched. These are the ones the
/// filter, stats, and export paths interpret.
pub mod keys {
    /// Identifier of the emitting application.
    pub const APPLICATION_ID: &str = "applicationId";
    /// Human-readable application name.
    pub const APPLICATION_NAME: &str = "applicationName";
    /// Deployment environment (e.g. `production`).
    pub const ENVIRONMENT: &str = "environment";
    /// Distributed trace identifier.
    pub const TRACE_ID: &str = "traceId";
    /// Request identifier.
    pub const REQUEST_ID: &str = "requestId";
    /// Identifier of the acting user.
    pub const USER_ID: &str = "userId";
}

/// Log severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debugging information
    Debug = 0,
    /// General information
    Info = 1,
    /// Warning conditions
    Warning = 2,
    /// Error conditions
    Error = 3,
}

impl LogLevel {
    /// All levels, in severity order.
    pub const ALL: [Self; 4] = [Self::Debug, Self::Info, Self::Warning, Self::Error];

    /// Returns true if this level is at least as severe as the given level.
    #[must_use]
    pub fn is_at_least(&self, level: Self) -> bool {
        *self >= level
    }

    /// Returns the string representation of this level.
    ///
    /// Note the third level is spelled `warning`, never `warn`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(EngineError::UnknownLevel(other.to_string())),
        }
    }
}

/// A single log record.
///
/// Identity lives in `id`; uniqueness is enforced by the store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique identifier for this entry
    pub id: String,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// Severity level
    pub level: LogLevel,
    /// Emitting subsystem (e.g. `api-gateway`)
    pub source: String,
    /// Human-readable message
    pub message: String,
    /// Open metadata map; see [`keys`] for recognized entries
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Ordered tags; duplicates permitted
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LogEntry {
    /// Creates a new log entry builder.
    #[must_use]
    pub fn builder() -> LogEntryBuilder {
        LogEntryBuilder::default()
    }

    /// Looks up a metadata value by key.
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// The `applicationId` metadata value, when present.
    #[must_use]
    pub fn application_id(&self) -> Option<&str> {
        self.metadata_value(keys::APPLICATION_ID)
    }

    /// The `applicationName` metadata value, when present.
    #[must_use]
    pub fn application_name(&self) -> Option<&str> {
        self.metadata_value(keys::APPLICATION_NAME)
    }

    /// The `environment` metadata value, when present.
    #[must_use]
    pub fn environment(&self) -> Option<&str> {
        self.metadata_value(keys::ENVIRONMENT)
    }

    /// The `traceId` metadata value, when present.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.metadata_value(keys::TRACE_ID)
    }

    /// Checks if this entry matches the given filter.
    ///
    /// Evaluation is strictly conjunctive: every populated rule must
    /// hold. Each guard below can only reject; in particular a search
    /// hit never bypasses the remaining constraints.
    #[must_use]
    pub fn matches(&self, filter: &LogFilter) -> bool {
        // Check level filter
        if !filter.levels.is_empty() && !filter.levels.contains(&self.level) {
            return false;
        }

        // Check source filter
        if !filter.sources.is_empty() && !filter.sources.contains(&self.source) {
            return false;
        }

        // Check application filter; an entry without the key never
        // matches a populated constraint
        if let Some(ref application_id) = filter.application_id {
            if self.application_id() != Some(application_id.as_str()) {
                return false;
            }
        }

        // Check environment filter
        if let Some(ref environment) = filter.environment {
            if self.environment() != Some(environment.as_str()) {
                return false;
            }
        }

        // Check tag filter: at least one filter tag must appear
        if !filter.tags.is_empty() && !filter.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }

        // Check text search over message, application name, and source
        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            let in_message = self.message.to_lowercase().contains(&needle);
            let in_application = self
                .application_name()
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            let in_source = self.source.to_lowercase().contains(&needle);
            if !in_message && !in_application && !in_source {
                return false;
            }
        }

        // Check date range, inclusive on both ends
        if let Some(start) = filter.start_date {
            if self.timestamp < start {
                return false;
            }
        }
        if let Some(end) = filter.end_date {
            if self.timestamp > end {
                return false;
            }
        }

        true
    }
}

/// Conjunctive filter criteria for querying logs.
///
/// Every field is optional; an empty filter matches all entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    /// Start of the time range, inclusive
    pub start_date: Option<DateTime<Utc>>,
    /// End of the time range, inclusive
    pub end_date: Option<DateTime<Utc>>,
    /// Filter by log levels (empty means all levels)
    #[serde(default)]
    pub levels: Vec<LogLevel>,
    /// Filter by sources (empty means all sources)
    #[serde(default)]
    pub sources: Vec<String>,
    /// Exact match on the `applicationId` metadata value
    pub application_id: Option<String>,
    /// Exact match on the `environment` metadata value
    pub environment: Option<String>,
    /// Any-match over entry tags (empty means no constraint)
    #[serde(default)]
    pub tags: Vec<String>,
    /// Case-insensitive substring over message, application name, and source
    pub search: Option<String>,
}

impl LogFilter {
    /// Creates a new empty filter that matches all logs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a level to the allowed set.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.levels.push(level);
        self
    }

    /// Adds a source to the allowed set.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Requires an exact `applicationId` metadata match.
    #[must_use]
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    /// Requires an exact `environment` metadata match.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Adds a tag to the any-match set.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a case-insensitive text search.
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Sets the inclusive start of the time range.
    #[must_use]
    pub const fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Sets the inclusive end of the time range.
    #[must_use]
    pub const fn with_end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Returns true if no rule is populated.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.levels.is_empty()
            && self.sources.is_empty()
            && self.application_id.is_none()
            && self.environment.is_none()
            && self.tags.is_empty()
            && self.search.is_none()
    }

    /// Validates the filter's time range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFilterRange`] if the start date is
    /// after the end date.
    pub fn validate(&self) -> crate::error::Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(EngineError::InvalidFilterRange { start, end });
            }
        }
        Ok(())
    }
}

/// Builder for constructing log entries.
///
/// `id`, `source`, and `message` are required; the timestamp defaults to
/// now and the level to [`LogLevel::Info`].
#[derive(Debug, Default)]
pub struct LogEntryBuilder {
    id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    level: Option<LogLevel>,
    source: Option<String>,
    message: Option<String>,
    metadata: HashMap<String, String>,
    tags: Vec<String>,
}

impl LogEntryBuilder {
    /// Sets the entry ID.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the log level.
    #[must_use]
    pub const fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the source.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builds the log entry.
    ///
    /// # Errors
    ///
    /// Returns an error if `id`, `source`, or `message` is not set.
    pub fn build(self) -> crate::error::Result<LogEntry> {
        let id = self.id.ok_or(EngineError::MissingField("id"))?;
        let source = self.source.ok_or(EngineError::MissingField("source"))?;
        let message = self.message.ok_or(EngineError::MissingField("message"))?;

        Ok(LogEntry {
            id,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            level: self.level.unwrap_or(LogLevel::Info),
            source,
            message,
            metadata: self.metadata,
            tags: self.tags,
        })
    }
}
