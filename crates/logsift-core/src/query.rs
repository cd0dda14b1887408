//! Filter evaluation over log entry slices.
//!
//! Evaluation is strictly conjunctive: an entry is returned only if it
//! satisfies every populated rule of the filter. The per-entry predicate
//! lives on [`LogEntry::matches`]; this module adds range validation and
//! order-preserving collection.

use crate::error::Result;
use crate::types::{LogEntry, LogFilter};

/// Evaluates a filter against a slice of entries.
///
/// Input order is preserved, so evaluating a store snapshot yields
/// results newest first. An unconstrained filter returns every entry.
///
/// # Errors
///
/// Returns [`crate::EngineError::InvalidFilterRange`] if the filter's
/// start date is after its end date; no entries are inspected in that
/// case.
pub fn evaluate(entries: &[LogEntry], filter: &LogFilter) -> Result<Vec<LogEntry>> {
    filter.validate()?;

    Ok(entries
        .iter()
        .filter(|entry| entry.matches(filter))
        .cloned()
        .collect())
}
