//! Admission gate: lets many producers admit concurrently and gives the
//! shutdown caller a way to wait until every in-flight admission has ended.
//!
//! Producers take a shared [`AdmissionTicket`]; shutdown flips the gate to
//! [`QueueState::Stopping`] and then waits for the ticket count to reach zero.
//! Once flipped, the gate never issues another ticket. No semaphore sized to
//! an artificial maximum is involved: the ticket count is an unbounded
//! counter guarded by the gate mutex, paired with a condition variable.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

/// Lifecycle of a queue. Transitions are monotonic and each fires once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueState {
    /// Admissions are accepted.
    Running,
    /// Shutdown has begun; in-flight admissions are finishing.
    Stopping,
    /// The store has been drained; the queue is terminal.
    Stopped,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Outcome of [`AdmissionGate::close_and_await_drain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownRole {
    /// This caller flipped the gate and must drain the store, then call
    /// [`AdmissionGate::mark_stopped`].
    Initiator,
    /// Another caller already shut the queue down; it has finished draining.
    Follower,
}

struct GateState {
    state: QueueState,
    in_flight: usize,
}

/// Shared/exclusive gate guarding writes into a task store.
pub struct AdmissionGate {
    /// Mirrors `state != Running` so rejected producers skip the mutex.
    stopping: AtomicBool,
    inner: Mutex<GateState>,
    changed: Condvar,
}

impl AdmissionGate {
    /// Create an open gate.
    pub fn new() -> Self {
        Self {
            stopping: AtomicBool::new(false),
            inner: Mutex::new(GateState {
                state: QueueState::Running,
                in_flight: 0,
            }),
            changed: Condvar::new(),
        }
    }

    /// Begin an admission. Returns `None` once the gate has been closed.
    ///
    /// The returned ticket ends the admission when dropped, including on unwind.
    pub fn begin_admission(&self) -> Option<AdmissionTicket<'_>> {
        if self.stopping.load(Ordering::Acquire) {
            return None;
        }
        let mut inner = self.inner.lock();
        if inner.state != QueueState::Running {
            return None;
        }
        inner.in_flight += 1;
        Some(AdmissionTicket { gate: self })
    }

    fn end_admission(&self) {
        let mut inner = self.inner.lock();
        inner.in_flight -= 1;
        if inner.in_flight == 0 && inner.state != QueueState::Running {
            self.changed.notify_all();
        }
    }

    /// Close the gate and block until every ticket issued before the close
    /// has been dropped.
    ///
    /// The wait is uninterruptible. Must not be called while the current
    /// thread holds a ticket of this gate. A caller arriving after the gate
    /// was already closed waits for [`mark_stopped`](Self::mark_stopped) and
    /// gets [`ShutdownRole::Follower`].
    pub fn close_and_await_drain(&self) -> ShutdownRole {
        self.close_and_await_drain_with(|| {})
    }

    /// Same as [`close_and_await_drain`](Self::close_and_await_drain), running
    /// `on_close` once, right after the flip and before the wait, and only in
    /// the initiating caller. The gate mutex is not held while it runs.
    pub fn close_and_await_drain_with<F>(&self, on_close: F) -> ShutdownRole
    where
        F: FnOnce(),
    {
        let mut inner = self.inner.lock();
        if inner.state != QueueState::Running {
            self.changed
                .wait_while(&mut inner, |s| s.state != QueueState::Stopped);
            return ShutdownRole::Follower;
        }
        inner.state = QueueState::Stopping;
        self.stopping.store(true, Ordering::Release);
        MutexGuard::unlocked(&mut inner, on_close);
        self.changed.wait_while(&mut inner, |s| s.in_flight > 0);
        ShutdownRole::Initiator
    }

    /// Record that the drain has completed and release any follower.
    pub fn mark_stopped(&self) {
        let mut inner = self.inner.lock();
        debug_assert_eq!(inner.state, QueueState::Stopping);
        debug_assert_eq!(inner.in_flight, 0);
        inner.state = QueueState::Stopped;
        self.changed.notify_all();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> QueueState {
        self.inner.lock().state
    }

    /// `true` once shutdown has begun.
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    /// Number of admissions currently holding a ticket.
    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdmissionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("AdmissionGate")
            .field("state", &inner.state)
            .field("in_flight", &inner.in_flight)
            .finish()
    }
}

/// Shared slot held for the duration of one admission.
#[must_use = "dropping the ticket immediately ends the admission"]
pub struct AdmissionTicket<'a> {
    gate: &'a AdmissionGate,
}

impl Drop for AdmissionTicket<'_> {
    fn drop(&mut self) {
        self.gate.end_admission();
    }
}
