//! Error types for queue operations.

use thiserror::Error;

/// Errors produced by queue components.
///
/// Rejection by shutdown and a busy consumer token are not errors: they are
/// reported as `false` / `None` by the queue operations themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A batch reservation could not be satisfied by the bounded queue.
    #[error("tasks queue is full: remaining capacity {remaining}, requested {requested}")]
    CapacityExceeded {
        /// Number of tasks the producer tried to admit.
        requested: usize,
        /// Capacity that was still free at the time of the check.
        remaining: usize,
    },
    /// A blocking wait was cancelled before an element arrived.
    #[error("interrupted while waiting for a task: {0}")]
    Interrupted(String),
    /// Configuration or constructor arguments are invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Internal failure (runtime thread panic, broken invariant).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
