//! Error types for fetch operations.

use logsift_core::EngineError;
use thiserror::Error;

/// Errors surfaced by a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The query itself was rejected by the engine.
    #[error(transparent)]
    Query(#[from] EngineError),

    /// The data source failed; the message is human-readable.
    ///
    /// Fetches are not retried. The scheduler records the message on the
    /// caller-visible view and leaves the previous result intact.
    #[error("fetch failed: {0}")]
    Failed(String),
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
