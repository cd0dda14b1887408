//! Single-pass statistics over log entry slices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{LogEntry, LogLevel};

/// Environment bucket for entries without an `environment` metadata key.
pub const UNKNOWN_ENVIRONMENT: &str = "unknown";

/// Aggregated counts over a set of log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    /// Number of entries aggregated
    pub total_logs: usize,
    /// Entries at [`LogLevel::Error`]
    pub error_count: usize,
    /// Entries at [`LogLevel::Warning`]
    pub warning_count: usize,
    /// Entry count per source
    #[serde(default)]
    pub source_distribution: HashMap<String, usize>,
    /// Entry count per level
    #[serde(default)]
    pub level_distribution: HashMap<LogLevel, usize>,
    /// Entry count per environment; missing environments count under
    /// [`UNKNOWN_ENVIRONMENT`]
    #[serde(default)]
    pub environment_distribution: HashMap<String, usize>,
}

impl LogStats {
    /// Count of entries at the given level.
    #[must_use]
    pub fn count_for_level(&self, level: LogLevel) -> usize {
        self.level_distribution.get(&level).copied().unwrap_or(0)
    }
}

/// Aggregates a slice of entries in one pass.
///
/// Every distribution sums to `total_logs`, and the dedicated error and
/// warning counters always agree with the level distribution.
#[must_use]
pub fn aggregate(entries: &[LogEntry]) -> LogStats {
    let mut stats = LogStats {
        total_logs: entries.len(),
        ..LogStats::default()
    };

    for entry in entries {
        match entry.level {
            LogLevel::Error => stats.error_count += 1,
            LogLevel::Warning => stats.warning_count += 1,
            LogLevel::Debug | LogLevel::Info => {}
        }

        *stats
            .source_distribution
            .entry(entry.source.clone())
            .or_insert(0) += 1;
        *stats.level_distribution.entry(entry.level).or_insert(0) += 1;

        let environment = entry.environment().unwrap_or(UNKNOWN_ENVIRONMENT);
        *stats
            .environment_distribution
            .entry(environment.to_string())
            .or_insert(0) += 1;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::keys;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn entry(id: &str, level: LogLevel, source: &str, environment: Option<&str>) -> LogEntry {
        let mut builder = LogEntry::builder()
            .id(id)
            .timestamp(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
            .level(level)
            .source(source)
            .message("event");
        if let Some(env) = environment {
            builder = builder.metadata(keys::ENVIRONMENT, env);
        }
        builder.build().expect("entry should build")
    }

    #[test]
    fn empty_slice_yields_default_stats() {
        let stats = aggregate(&[]);
        assert_eq!(stats, LogStats::default());
        assert_eq!(stats.total_logs, 0);
        assert!(stats.source_distribution.is_empty());
    }

    #[test]
    fn counts_errors_and_warnings() {
        let entries = vec![
            entry("a", LogLevel::Error, "api", Some("production")),
            entry("b", LogLevel::Warning, "api", Some("production")),
            entry("c", LogLevel::Warning, "billing", Some("staging")),
            entry("d", LogLevel::Info, "api", Some("production")),
        ];

        let stats = aggregate(&entries);
        assert_eq!(stats.total_logs, 4);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.warning_count, 2);
    }

    #[test]
    fn distributions_count_by_key() {
        let entries = vec![
            entry("a", LogLevel::Error, "api", Some("production")),
            entry("b", LogLevel::Info, "api", Some("staging")),
            entry("c", LogLevel::Info, "billing", Some("production")),
        ];

        let stats = aggregate(&entries);
        assert_eq!(stats.source_distribution.get("api"), Some(&2));
        assert_eq!(stats.source_distribution.get("billing"), Some(&1));
        assert_eq!(stats.environment_distribution.get("production"), Some(&2));
        assert_eq!(stats.environment_distribution.get("staging"), Some(&1));
        assert_eq!(stats.count_for_level(LogLevel::Info), 2);
        assert_eq!(stats.count_for_level(LogLevel::Error), 1);
        assert_eq!(stats.count_for_level(LogLevel::Debug), 0);
    }

    #[test]
    fn missing_environment_counts_as_unknown() {
        let entries = vec![
            entry("a", LogLevel::Info, "api", None),
            entry("b", LogLevel::Info, "api", Some("production")),
            entry("c", LogLevel::Info, "api", None),
        ];

        let stats = aggregate(&entries);
        assert_eq!(
            stats.environment_distribution.get(UNKNOWN_ENVIRONMENT),
            Some(&2)
        );
        assert_eq!(stats.environment_distribution.get("production"), Some(&1));
    }

    #[test]
    fn worked_example_counts() {
        // Store {A(error), B(info), C(warning)} aggregates to one of each.
        let entries = vec![
            entry("A", LogLevel::Error, "api", Some("production")),
            entry("C", LogLevel::Warning, "api", Some("production")),
            entry("B", LogLevel::Info, "api", Some("production")),
        ];

        let stats = aggregate(&entries);
        assert_eq!(stats.total_logs, 3);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.warning_count, 1);
        assert_eq!(stats.count_for_level(LogLevel::Error), 1);
        assert_eq!(stats.count_for_level(LogLevel::Warning), 1);
        assert_eq!(stats.count_for_level(LogLevel::Info), 1);
    }

    #[test]
    fn stats_serialization_uses_camel_case() {
        let stats = aggregate(&[entry("a", LogLevel::Error, "api", None)]);
        let json = serde_json::to_string(&stats).expect("serialize");

        assert!(json.contains("totalLogs"));
        assert!(json.contains("errorCount"));
        assert!(json.contains("levelDistribution"));
        assert!(json.contains("\"error\":1"));

        let parsed: LogStats = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(stats, parsed);
    }

    proptest! {
        #[test]
        fn level_counts_sum_to_total(levels in proptest::collection::vec(0u8..4, 0..80)) {
            let entries: Vec<LogEntry> = levels
                .iter()
                .enumerate()
                .map(|(i, l)| {
                    let level = LogLevel::ALL[*l as usize];
                    entry(&format!("log-{i}"), level, "api", Some("production"))
                })
                .collect();

            let stats = aggregate(&entries);

            let level_sum: usize = stats.level_distribution.values().sum();
            prop_assert_eq!(level_sum, stats.total_logs);

            let source_sum: usize = stats.source_distribution.values().sum();
            prop_assert_eq!(source_sum, stats.total_logs);

            let env_sum: usize = stats.environment_distribution.values().sum();
            prop_assert_eq!(env_sum, stats.total_logs);

            let others = stats.count_for_level(LogLevel::Debug)
                + stats.count_for_level(LogLevel::Info);
            prop_assert_eq!(
                stats.error_count + stats.warning_count + others,
                stats.total_logs
            );

            prop_assert_eq!(stats.error_count, stats.count_for_level(LogLevel::Error));
            prop_assert_eq!(stats.warning_count, stats.count_for_level(LogLevel::Warning));
        }
    }
}
