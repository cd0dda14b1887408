//! Deterministic sample log generation.
//!
//! Seeded fixtures replace ad-hoc random data: the same seed always
//! produces the same entries, so demos and tests are reproducible.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::Result;
use crate::store::LogStore;
use crate::types::{LogEntry, LogLevel, keys};

const SOURCES: [&str; 6] = [
    "api-gateway",
    "auth-service",
    "billing",
    "ingest",
    "scheduler",
    "worker-pool",
];

const APPLICATIONS: [(&str, &str); 4] = [
    ("app-001", "Atlas"),
    ("app-002", "Beacon"),
    ("app-003", "Cinder"),
    ("app-004", "Drift"),
];

const ENVIRONMENTS: [&str; 3] = ["production", "staging", "development"];

const DEBUG_MESSAGES: [&str; 4] = [
    "cache lookup",
    "connection pool checkout",
    "request headers parsed",
    "feature flag evaluated",
];

const INFO_MESSAGES: [&str; 4] = [
    "request completed",
    "user session refreshed",
    "batch job finished",
    "configuration reloaded",
];

const WARNING_MESSAGES: [&str; 4] = [
    "retrying upstream call",
    "response time above threshold",
    "queue depth growing",
    "certificate expires soon",
];

const ERROR_MESSAGES: [&str; 4] = [
    "upstream timeout",
    "database connection refused",
    "payment declined by processor",
    "unhandled exception in request handler",
];

// 2024-06-01T12:00:00Z
const DEFAULT_BASE_SECS: i64 = 1_717_243_200;

/// Seeded generator for realistic sample log entries.
///
/// Timestamps descend strictly from the base instant, so a generated
/// batch inserts into a [`LogStore`] without reordering and successive
/// entries never collide.
#[derive(Debug)]
pub struct SampleLogs {
    rng: StdRng,
    next_timestamp: DateTime<Utc>,
}

impl SampleLogs {
    /// Creates a generator from a seed. Equal seeds yield equal output.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_timestamp: DateTime::from_timestamp(DEFAULT_BASE_SECS, 0)
                .unwrap_or(DateTime::UNIX_EPOCH),
        }
    }

    /// Replaces the base instant timestamps descend from.
    #[must_use]
    pub const fn with_base_time(mut self, base: DateTime<Utc>) -> Self {
        self.next_timestamp = base;
        self
    }

    /// Generates the next entry.
    pub fn entry(&mut self) -> LogEntry {
        let timestamp = self.next_timestamp;
        let step = i64::from(self.rng.gen_range(1..=90_u32));
        self.next_timestamp -= Duration::seconds(step);

        let level = self.pick_level();
        let source = SOURCES[self.rng.gen_range(0..SOURCES.len())];
        let (application_id, application_name) =
            APPLICATIONS[self.rng.gen_range(0..APPLICATIONS.len())];
        // Roughly one entry in eight arrives without an environment; those
        // aggregate under the "unknown" bucket.
        let environment = if self.rng.gen_range(0..8_u8) == 0 {
            None
        } else {
            Some(ENVIRONMENTS[self.rng.gen_range(0..ENVIRONMENTS.len())])
        };
        let message = self.message_for(level);

        let mut metadata = HashMap::from([
            (keys::APPLICATION_ID.to_string(), application_id.to_string()),
            (
                keys::APPLICATION_NAME.to_string(),
                application_name.to_string(),
            ),
            (keys::TRACE_ID.to_string(), self.next_uuid()),
            (
                keys::REQUEST_ID.to_string(),
                format!("req-{:06}", self.rng.gen_range(0..1_000_000_u32)),
            ),
        ]);
        if let Some(env) = environment {
            metadata.insert(keys::ENVIRONMENT.to_string(), env.to_string());
        }
        if self.rng.gen_range(0..4_u8) == 0 {
            metadata.insert(
                keys::USER_ID.to_string(),
                format!("user-{:04}", self.rng.gen_range(0..10_000_u32)),
            );
        }

        let mut tags = vec![level.as_str().to_string(), source.to_string()];
        if let Some(env) = environment {
            tags.push(env.to_string());
        }
        if level == LogLevel::Error {
            tags.push("alert".to_string());
        }
        if source == "auth-service" {
            tags.push("audit".to_string());
        }

        LogEntry {
            id: self.next_uuid(),
            timestamp,
            level,
            source: source.to_string(),
            message,
            metadata,
            tags,
        }
    }

    /// Generates a batch of entries, newest first.
    pub fn entries(&mut self, count: usize) -> Vec<LogEntry> {
        (0..count).map(|_| self.entry()).collect()
    }

    /// Generates `count` entries and inserts them into the store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::BatchDuplicateId`] if a generated
    /// ID collides with an entry already stored.
    pub fn populate(&mut self, store: &LogStore, count: usize) -> Result<usize> {
        store.insert_batch(self.entries(count))
    }

    fn pick_level(&mut self) -> LogLevel {
        match self.rng.gen_range(0..100_u8) {
            0..=49 => LogLevel::Info,
            50..=74 => LogLevel::Debug,
            75..=89 => LogLevel::Warning,
            _ => LogLevel::Error,
        }
    }

    fn message_for(&mut self, level: LogLevel) -> String {
        let templates: &[&str] = match level {
            LogLevel::Debug => &DEBUG_MESSAGES,
            LogLevel::Info => &INFO_MESSAGES,
            LogLevel::Warning => &WARNING_MESSAGES,
            LogLevel::Error => &ERROR_MESSAGES,
        };
        let base = templates[self.rng.gen_range(0..templates.len())];

        if self.rng.gen_bool(0.5) {
            format!("{base} after {} ms", self.rng.gen_range(2..1_500_u32))
        } else {
            base.to_string()
        }
    }

    fn next_uuid(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string()
    }
}
