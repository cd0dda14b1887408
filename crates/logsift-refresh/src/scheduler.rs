//! Query scheduling with auto-refresh and stale-result arbitration.
//!
//! This module provides:
//! - [`QueryScheduler`] — Issues fetches on demand and on a timer
//! - [`QueryView`] — The caller-visible result of the latest fetch
//! - [`SchedulerState`] — Idle / Fetching / Scheduled
//! - [`RefreshConfig`] — Cadence configuration
//!
//! Every fetch, periodic or on-demand, takes the next value of one
//! monotonically increasing generation counter. A completing fetch
//! applies its result only while its generation is still the latest
//! issued, so the view always reflects the last-issued fetch regardless
//! of completion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use logsift_core::{LogEntry, LogFilter, LogStats};

use crate::fetcher::LogFetcher;

/// Conventional refresh cadence for callers with no better answer.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

/// Configuration for auto-refresh behavior.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between scheduled fetches.
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// The scheduler's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No auto-refresh armed and no fetch in flight.
    Idle,
    /// A one-shot fetch is in flight while auto-refresh is off.
    Fetching,
    /// Auto-refresh is armed at the given interval. Periodic ticks and
    /// immediate fetches do not leave this state.
    Scheduled {
        /// The armed cadence.
        interval: Duration,
    },
}

/// Caller-visible result of the most recent applied fetch.
///
/// A failed fetch updates only `last_error` and `generation`; entries
/// and stats keep their previous values until a fetch succeeds again.
#[derive(Debug, Clone, Default)]
pub struct QueryView {
    /// Matching entries, newest first
    pub entries: Vec<LogEntry>,
    /// Statistics over the whole source, unfiltered
    pub stats: LogStats,
    /// Message of the most recent failed fetch, cleared on success
    pub last_error: Option<String>,
    /// Generation of the fetch reflected here; 0 until one lands
    pub generation: u64,
    /// When entries and stats last changed
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Everything a fetch task needs, shared between the scheduler, its
/// timer task, and in-flight fetches.
#[derive(Clone)]
struct Shared {
    fetcher: Arc<dyn LogFetcher>,
    filter: Arc<RwLock<LogFilter>>,
    view: Arc<RwLock<QueryView>>,
    /// Latest issued generation; fetches apply only while theirs matches.
    /// Behind a mutex so timer ticks can couple allocation with the
    /// auto-refresh flag: a disarmed cadence can neither fetch nor
    /// advance the counter.
    generation: Arc<Mutex<u64>>,
    in_flight: Arc<AtomicU64>,
}

impl Shared {
    fn next_generation(&self) -> u64 {
        let mut latest = self.generation.lock();
        *latest += 1;
        *latest
    }

    /// Allocates a generation for a timer tick, or refuses if the
    /// cadence has been disarmed. The flag check and the allocation form
    /// one critical section with `disable_auto_refresh`, so a straggler
    /// tick can never out-generation a fetch issued after disable.
    fn issue_for_tick(&self, running: &AtomicBool) -> Option<u64> {
        let mut latest = self.generation.lock();
        if !running.load(Ordering::SeqCst) {
            return None;
        }
        *latest += 1;
        Some(*latest)
    }

    /// Spawns the fetch carrying `generation`. The filter is snapshotted
    /// here, synchronously, so a later `set_filter` cannot leak into an
    /// already-issued fetch.
    fn spawn_fetch(&self, generation: u64) {
        let fetcher = Arc::clone(&self.fetcher);
        let filter = self.filter.read().clone();
        let view = Arc::clone(&self.view);
        let latest = Arc::clone(&self.generation);
        let in_flight = Arc::clone(&self.in_flight);

        in_flight.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
            let result = fetcher.fetch(&filter).await;

            {
                let mut view = view.write();
                let current = *latest.lock();
                if current == generation {
                    match result {
                        Ok(outcome) => {
                            view.entries = outcome.entries;
                            view.stats = outcome.stats;
                            view.last_error = None;
                            view.generation = generation;
                            view.refreshed_at = Some(Utc::now());
                            debug!(generation, count = view.entries.len(), "fetch applied");
                        }
                        Err(err) => {
                            view.last_error = Some(err.to_string());
                            view.generation = generation;
                            warn!(generation, error = %err, "fetch failed");
                        }
                    }
                } else {
                    debug!(generation, latest = current, "stale fetch result discarded");
                }
            }

            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }
}

/// Auto-refresh bookkeeping. Dropping the flag does not stop the timer;
/// flipping it does.
struct AutoRefresh {
    interval: Duration,
    running: Arc<AtomicBool>,
}

/// Schedules fetches against a [`LogFetcher`].
///
/// All methods take `&self`; the scheduler is safe to share behind an
/// `Arc` with UI or service layers. Fetch-issuing methods must be called
/// within a Tokio runtime.
pub struct QueryScheduler {
    shared: Shared,
    auto: RwLock<Option<AutoRefresh>>,
}

impl QueryScheduler {
    /// Creates a scheduler with an unconstrained filter.
    #[must_use]
    pub fn new(fetcher: Arc<dyn LogFetcher>) -> Self {
        Self::with_filter(fetcher, LogFilter::new())
    }

    /// Creates a scheduler with an initial filter.
    #[must_use]
    pub fn with_filter(fetcher: Arc<dyn LogFetcher>, filter: LogFilter) -> Self {
        Self {
            shared: Shared {
                fetcher,
                filter: Arc::new(RwLock::new(filter)),
                view: Arc::new(RwLock::new(QueryView::default())),
                generation: Arc::new(Mutex::new(0)),
                in_flight: Arc::new(AtomicU64::new(0)),
            },
            auto: RwLock::new(None),
        }
    }

    /// Returns a copy of the caller-visible view.
    #[must_use]
    pub fn view(&self) -> QueryView {
        self.shared.view.read().clone()
    }

    /// Returns a copy of the active filter.
    #[must_use]
    pub fn filter(&self) -> LogFilter {
        self.shared.filter.read().clone()
    }

    /// The latest issued generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.shared.generation.lock()
    }

    /// The scheduler's current state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        if let Some(auto) = self.auto.read().as_ref() {
            if auto.running.load(Ordering::SeqCst) {
                return SchedulerState::Scheduled {
                    interval: auto.interval,
                };
            }
        }
        if self.shared.in_flight.load(Ordering::SeqCst) > 0 {
            SchedulerState::Fetching
        } else {
            SchedulerState::Idle
        }
    }

    /// Issues an on-demand fetch and returns its generation.
    ///
    /// Under `Scheduled` the timer cadence is not disturbed; from `Idle`
    /// the state passes through `Fetching` and back.
    pub fn refresh(&self) -> u64 {
        let generation = self.shared.next_generation();
        self.shared.spawn_fetch(generation);
        generation
    }

    /// Replaces the active filter and issues an immediate fetch.
    ///
    /// Returns the fetch's generation. While `Scheduled`, the timer keeps
    /// its cadence; subsequent ticks use the new filter.
    pub fn set_filter(&self, filter: LogFilter) -> u64 {
        *self.shared.filter.write() = filter;
        debug!("filter replaced, issuing immediate fetch");
        self.refresh()
    }

    /// Arms auto-refresh: one fetch immediately, then one per interval.
    ///
    /// Re-enabling replaces the previous cadence.
    pub fn enable_auto_refresh(&self, interval: Duration) {
        let running = Arc::new(AtomicBool::new(true));

        {
            // One guard across stop-and-replace: two racing enables must
            // not both observe no cadence and orphan one of the two
            // timer tasks they spawn.
            let mut auto = self.auto.write();
            if let Some(previous) = auto.take() {
                previous.running.store(false, Ordering::SeqCst);
            }
            *auto = Some(AutoRefresh {
                interval,
                running: Arc::clone(&running),
            });
        }

        let shared = self.shared.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                let Some(generation) = shared.issue_for_tick(&running) else {
                    break;
                };
                shared.spawn_fetch(generation);
            }
        });

        info!(interval_ms = interval.as_millis() as u64, "auto-refresh enabled");
    }

    /// Disarms auto-refresh.
    ///
    /// No timer fires afterwards. A fetch in flight at this moment runs
    /// to completion but its result is discarded.
    pub fn disable_auto_refresh(&self) {
        if let Some(auto) = self.auto.write().take() {
            // Flip the flag and advance the counter under the issuance
            // lock: every fetch issued so far is now stale, and no
            // further tick can allocate.
            let mut latest = self.shared.generation.lock();
            auto.running.store(false, Ordering::SeqCst);
            *latest += 1;
            info!("auto-refresh disabled");
        }
    }
}

impl Drop for QueryScheduler {
    fn drop(&mut self) {
        if let Some(auto) = self.auto.get_mut().take() {
            auto.running.store(false, Ordering::SeqCst);
        }
    }
}
