//! CSV export of log entries.
//!
//! Hand-rolled on purpose: the format is a fixed seven-column table and
//! the quoting rules are small enough to state exactly. Fields containing
//! a comma, double quote, or newline are wrapped in double quotes with
//! embedded quotes doubled.

#![allow(clippy::format_push_string)]

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::LogEntry;

/// The fixed CSV header row.
pub const CSV_HEADER: &str = "timestamp,level,source,message,application,environment,traceId";

/// Formats entries as CSV, one row per entry in input order.
///
/// The `application`, `environment`, and `traceId` columns come from the
/// entry metadata; missing keys render as empty fields. An empty slice
/// yields the header row alone rather than an error.
#[must_use]
pub fn to_csv(entries: &[LogEntry]) -> String {
    let mut output = String::new();
    output.push_str(CSV_HEADER);
    output.push('\n');

    for entry in entries {
        output.push_str(&format_row(entry));
        output.push('\n');
    }

    output
}

/// Suggested filename for an export taken at the given instant:
/// `logs-<ISO-8601 basic timestamp>.csv`.
///
/// The basic format carries no colons, so the name is safe on every
/// filesystem. The instant is a parameter so callers and tests control
/// the clock.
#[must_use]
pub fn suggested_filename(now: DateTime<Utc>) -> String {
    format!("logs-{}.csv", now.format("%Y%m%dT%H%M%SZ"))
}

/// Escapes a single CSV field.
///
/// Quoting triggers only when the field contains a comma, double quote,
/// or newline; quoted fields double any embedded quotes.
#[must_use]
pub fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_row(entry: &LogEntry) -> String {
    let columns = [
        entry
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        entry.level.as_str().to_string(),
        entry.source.clone(),
        entry.message.clone(),
        entry.application_name().unwrap_or_default().to_string(),
        entry.environment().unwrap_or_default().to_string(),
        entry.trace_id().unwrap_or_default().to_string(),
    ];

    columns
        .iter()
        .map(|column| csv_field(column))
        .collect::<Vec<_>>()
        .join(",")
}
