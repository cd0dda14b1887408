//! On-demand and scheduled query refresh for logsift.
//!
//! This crate connects a [`logsift_core`] store (or any other log
//! backend) to callers that want a continuously fresh query result:
//!
//! - [`LogFetcher`] — the async seam a scheduler fetches through
//! - [`StoreFetcher`] — fetcher over an in-process [`logsift_core::LogStore`]
//! - [`QueryScheduler`] — on-demand and periodic fetches with
//!   last-issued-wins arbitration
//! - [`QueryView`] — entries, stats, and error indicator of the latest fetch
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use logsift_core::shared_store;
//! use logsift_refresh::{QueryScheduler, SchedulerState, StoreFetcher};
//!
//! let store = shared_store();
//! let scheduler = QueryScheduler::new(Arc::new(StoreFetcher::new(store)));
//! assert_eq!(scheduler.state(), SchedulerState::Idle);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod fetcher;
pub mod scheduler;

pub use error::{FetchError, Result};
pub use fetcher::{FetchOutcome, LogFetcher, StoreFetcher};
pub use scheduler::{
    DEFAULT_REFRESH_INTERVAL, QueryScheduler, QueryView, RefreshConfig, SchedulerState,
};
