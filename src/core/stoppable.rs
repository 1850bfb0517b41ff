//! Unbounded priority queue with graceful shutdown.
//!
//! Producers admit tasks (singly or in batches) until [`StoppableTaskQueue::shutdown`]
//! is called. Shutdown stops admission, waits for admissions already in
//! progress, then drains the queue and hands back every task nobody consumed.
//! Once the shutdown call has begun, no thread can add further tasks.
//!
//! ```
//! use prometheus_task_queue::core::{PriorityTask, StoppableTaskQueue};
//!
//! let queue = StoppableTaskQueue::new();
//! assert!(queue.admit_batch(vec![PriorityTask::low("b"), PriorityTask::high("a")]));
//! assert_eq!(queue.poll(), Some(PriorityTask::high("a")));
//!
//! let unprocessed = queue.shutdown();
//! assert_eq!(unprocessed, vec![PriorityTask::low("b")]);
//! assert!(!queue.admit(PriorityTask::low("c")));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::admission::{AdmissionGate, QueueState, ShutdownRole};
use crate::core::events::{emit, QueueEventKind, QueueEventSink};
use crate::core::PriorityTask;
use crate::infra::queue::{PriorityStore, TaskStore};
use crate::util::serde::QueueId;

/// Priority-ordered, unbounded task queue with a non-blocking consumer side.
pub struct StoppableTaskQueue<T> {
    id: QueueId,
    gate: AdmissionGate,
    store: PriorityStore<PriorityTask<T>>,
    events: Option<Arc<dyn QueueEventSink>>,
}

impl<T: Ord> StoppableTaskQueue<T> {
    /// Create an empty, running queue.
    pub fn new() -> Self {
        let id = QueueId::new();
        debug!(queue = %id, "created priority task queue");
        Self {
            id,
            gate: AdmissionGate::new(),
            store: PriorityStore::new(),
            events: None,
        }
    }

    /// Attach an event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn QueueEventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Admit one task. See [`admit_batch`](Self::admit_batch).
    pub fn admit(&self, task: PriorityTask<T>) -> bool {
        self.admit_batch(vec![task])
    }

    /// Admit a batch atomically: either every task becomes visible to the
    /// consumer or none does.
    ///
    /// Returns `false` if the queue is stopping or stopped. That is the
    /// expected outcome for producers racing a shutdown, not an error.
    pub fn admit_batch(&self, tasks: Vec<PriorityTask<T>>) -> bool {
        let count = tasks.len();
        let Some(_ticket) = self.gate.begin_admission() else {
            debug!(queue = %self.id, count, "queue is stopping, batch rejected");
            emit(self.events.as_ref(), self.id, QueueEventKind::Rejected { count });
            return false;
        };
        if count == 0 {
            return true;
        }
        self.store.extend(tasks);
        emit(self.events.as_ref(), self.id, QueueEventKind::Admitted { count });
        true
    }

    /// Remove and return the highest-priority task, or `None` if the queue is
    /// empty. Never blocks.
    pub fn poll(&self) -> Option<PriorityTask<T>> {
        self.store.poll()
    }

    /// Stop the queue, wait for in-flight admissions, then drain it.
    ///
    /// Returns the unprocessed tasks in poll order. The wait cannot be
    /// interrupted. Calling `shutdown` again (or concurrently) waits for the
    /// first call to finish and returns an empty `Vec`.
    pub fn shutdown(&self) -> Vec<PriorityTask<T>> {
        let role = self.gate.close_and_await_drain_with(|| {
            info!(queue = %self.id, "shutting down priority task queue");
            emit(self.events.as_ref(), self.id, QueueEventKind::ShutdownStarted);
        });
        if role == ShutdownRole::Follower {
            debug!(queue = %self.id, "queue already shut down");
            return Vec::new();
        }
        let drained = self.store.drain_all();
        self.gate.mark_stopped();
        info!(queue = %self.id, drained = drained.len(), "priority task queue stopped");
        emit(
            self.events.as_ref(),
            self.id,
            QueueEventKind::ShutdownCompleted {
                drained: drained.len(),
            },
        );
        drained
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// `true` if no task is queued.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<T> StoppableTaskQueue<T> {
    /// Lifecycle state.
    pub fn state(&self) -> QueueState {
        self.gate.state()
    }

    /// `true` once shutdown has begun.
    pub fn is_stopping(&self) -> bool {
        self.gate.is_stopping()
    }

    /// Identifier used in logs and events.
    pub const fn id(&self) -> QueueId {
        self.id
    }
}

impl<T: Ord> Default for StoppableTaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for StoppableTaskQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoppableTaskQueue")
            .field("id", &self.id)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
