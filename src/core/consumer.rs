//! Consumer gate: at most one thread may block on a queue at a time.
//!
//! Acquisition is a non-blocking try-lock. A caller that finds the token held
//! returns immediately instead of queuing up as a second waiter, which keeps
//! "busy" distinguishable from "empty".

use parking_lot::{Mutex, MutexGuard};

/// Binary token guarding blocking reads.
#[derive(Debug, Default)]
pub struct ConsumerGate {
    token: Mutex<()>,
}

impl ConsumerGate {
    /// Create a gate with the token free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the token if nobody holds it. Never blocks.
    pub fn try_enter(&self) -> Option<ConsumerToken<'_>> {
        self.token.try_lock().map(|guard| ConsumerToken { _guard: guard })
    }

    /// `true` while some thread holds the token.
    pub fn is_busy(&self) -> bool {
        self.token.is_locked()
    }
}

/// Proof of exclusive consumer access; released on drop.
#[must_use = "the token is released as soon as it is dropped"]
pub struct ConsumerToken<'a> {
    _guard: MutexGuard<'a, ()>,
}
