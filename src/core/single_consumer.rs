//! Bounded FIFO queue for many producers and a single blocking consumer.
//!
//! Admission is all-or-nothing per batch and never overshoots the capacity,
//! however many producers race. Exactly one thread at a time may block in
//! [`SingleConsumerQueue::blocking_take`]; other callers get `Ok(None)` right
//! away, meaning "another consumer is already servicing the queue", not
//! "the queue is empty".

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::admission::{AdmissionGate, QueueState, ShutdownRole};
use crate::core::capacity::CapacityAccountant;
use crate::core::consumer::{ConsumerGate, ConsumerToken};
use crate::core::events::{emit, QueueEventKind, QueueEventSink};
use crate::core::QueueError;
use crate::infra::queue::{BoundedStore, TaskStore};
use crate::util::serde::QueueId;

/// Capacity used by [`SingleConsumerQueue::new`].
pub const DEFAULT_CAPACITY: usize = 10_000;

const DEFAULT_CAPACITY_NZ: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CAPACITY) {
    Some(n) => n,
    None => panic!("default capacity must be non-zero"),
};

/// Capacity-bounded FIFO task queue with a single blocking consumer.
pub struct SingleConsumerQueue<T> {
    id: QueueId,
    gate: AdmissionGate,
    accountant: CapacityAccountant,
    store: BoundedStore<T>,
    consumer: ConsumerGate,
    events: Option<Arc<dyn QueueEventSink>>,
}

impl<T> SingleConsumerQueue<T> {
    /// Create a queue holding up to [`DEFAULT_CAPACITY`] tasks.
    pub fn new() -> Self {
        Self::with_nonzero_capacity(DEFAULT_CAPACITY_NZ)
    }

    /// Create a queue holding up to `capacity` tasks.
    ///
    /// Fails with [`QueueError::InvalidConfig`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, QueueError> {
        NonZeroUsize::new(capacity)
            .map(Self::with_nonzero_capacity)
            .ok_or_else(|| QueueError::InvalidConfig("queue capacity must be greater than 0".into()))
    }

    fn with_nonzero_capacity(capacity: NonZeroUsize) -> Self {
        let id = QueueId::new();
        debug!(queue = %id, capacity = capacity.get(), "created single-consumer task queue");
        Self {
            id,
            gate: AdmissionGate::new(),
            accountant: CapacityAccountant::new(capacity.get()),
            store: BoundedStore::with_capacity(capacity),
            consumer: ConsumerGate::new(),
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
    pub fn admit(&self, task: T) -> Result<bool, QueueError> {
        self.admit_batch(vec![task])
    }

    /// Admit a batch atomically.
    ///
    /// - `Ok(true)`: every task is now visible to the consumer.
    /// - `Ok(false)`: the queue is stopping or stopped; nothing was stored.
    /// - `Err(QueueError::CapacityExceeded)`: the batch does not fit into the
    ///   capacity left after counting stored tasks and other producers'
    ///   outstanding reservations; nothing was stored. Not retried.
    pub fn admit_batch(&self, tasks: Vec<T>) -> Result<bool, QueueError> {
        let count = tasks.len();
        let Some(_ticket) = self.gate.begin_admission() else {
            debug!(queue = %self.id, count, "queue is stopping, batch rejected");
            emit(self.events.as_ref(), self.id, QueueEventKind::Rejected { count });
            return Ok(false);
        };
        if count == 0 {
            return Ok(true);
        }

        let reservation = self
            .accountant
            .reserve(count, || self.store.len())
            .inspect_err(|err| {
                if let QueueError::CapacityExceeded { requested, remaining } = *err {
                    warn!(queue = %self.id, requested, remaining, "tasks queue is full");
                    emit(
                        self.events.as_ref(),
                        self.id,
                        QueueEventKind::CapacityExhausted { requested, remaining },
                    );
                }
            })?;

        reservation
            .commit_with(|| self.store.push_all(tasks))
            .map_err(|refused| {
                QueueError::Internal(format!(
                    "store refused a reserved batch of {} tasks",
                    refused.len()
                ))
            })?;
        emit(self.events.as_ref(), self.id, QueueEventKind::Admitted { count });
        Ok(true)
    }

    /// Take the head task, blocking until one arrives.
    ///
    /// - `Ok(Some(task))`: this caller held the consumer token and got a task.
    /// - `Ok(None)`: another thread already holds the token; this caller did
    ///   not wait. Not an "empty queue" signal.
    /// - `Err(QueueError::Interrupted)`: the wait was cancelled through
    ///   [`interrupt_consumer`](Self::interrupt_consumer).
    pub fn blocking_take(&self) -> Result<Option<T>, QueueError> {
        let Some(_token) = self.try_enter_consumer() else {
            return Ok(None);
        };
        self.store.take().map(Some)
    }

    /// Like [`blocking_take`](Self::blocking_take) but waits at most
    /// `timeout`. `Ok(None)` means busy or timed out.
    pub fn take_timeout(&self, timeout: Duration) -> Result<Option<T>, QueueError> {
        let Some(_token) = self.try_enter_consumer() else {
            return Ok(None);
        };
        self.store.take_timeout(timeout)
    }

    fn try_enter_consumer(&self) -> Option<ConsumerToken<'_>> {
        let token = self.consumer.try_enter();
        if token.is_none() {
            debug!(queue = %self.id, "acquired by another consumer");
            emit(self.events.as_ref(), self.id, QueueEventKind::ConsumerBusy);
        }
        token
    }

    /// Cancel the consumer blocked in [`blocking_take`](Self::blocking_take)
    /// (or the next one to block), which then fails with
    /// [`QueueError::Interrupted`] carrying `cause`.
    pub fn interrupt_consumer(&self, cause: impl Into<String>) {
        let cause = cause.into();
        debug!(queue = %self.id, %cause, "interrupting consumer");
        self.store.interrupt(cause);
    }

    /// Drop an interrupt nobody consumed, so it cannot cancel a later consumer.
    pub(crate) fn withdraw_interrupt(&self) -> Option<String> {
        self.store.withdraw_interrupt()
    }

    /// Stop the queue, wait for in-flight admissions, then drain it.
    ///
    /// Returns the unprocessed tasks in FIFO order. The wait cannot be
    /// interrupted. Calling `shutdown` again (or concurrently) waits for the
    /// first call to finish and returns an empty `Vec`. A consumer blocked on
    /// the empty queue stays blocked until interrupted.
    pub fn shutdown(&self) -> Vec<T> {
        let role = self.gate.close_and_await_drain_with(|| {
            info!(queue = %self.id, "shutting down single-consumer task queue");
            emit(self.events.as_ref(), self.id, QueueEventKind::ShutdownStarted);
        });
        if role == ShutdownRole::Follower {
            debug!(queue = %self.id, "queue already shut down");
            return Vec::new();
        }
        let drained = self.store.drain_all();
        self.gate.mark_stopped();
        info!(queue = %self.id, drained = drained.len(), "single-consumer task queue stopped");
        emit(
            self.events.as_ref(),
            self.id,
            QueueEventKind::ShutdownCompleted {
                drained: drained.len(),
            },
        );
        drained
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// `true` if no task is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Fixed capacity.
    pub const fn capacity(&self) -> usize {
        self.accountant.capacity()
    }

    /// Capacity still available to producers: stored tasks and outstanding
    /// reservations are both subtracted.
    pub fn remaining_capacity(&self) -> usize {
        self.capacity()
            .saturating_sub(self.store.len())
            .saturating_sub(self.accountant.reserved())
    }

    /// `true` while a consumer holds the token.
    pub fn has_active_consumer(&self) -> bool {
        self.consumer.is_busy()
    }

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

impl<T: Clone> SingleConsumerQueue<T> {
    /// Clone of the head task without removing it.
    pub fn peek(&self) -> Option<T> {
        self.store.peek()
    }
}

impl<T> Default for SingleConsumerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SingleConsumerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleConsumerQueue")
            .field("id", &self.id)
            .field("gate", &self.gate)
            .field("accountant", &self.accountant)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::InMemoryEventSink;

    #[test]
    fn test_adding_enough_capacity() {
        let queue = SingleConsumerQueue::with_capacity(2).unwrap();
        assert_eq!(queue.admit(1), Ok(true));
        assert_eq!(queue.admit(2), Ok(true));
        assert_eq!(queue.blocking_take(), Ok(Some(1)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_adding_not_enough_capacity() {
        let queue = SingleConsumerQueue::with_capacity(2).unwrap();
        let err = queue.admit_batch(vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            QueueError::CapacityExceeded {
                requested: 3,
                remaining: 2
            }
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_adding_not_enough_capacity_into_non_empty_queue() {
        let queue = SingleConsumerQueue::with_capacity(2).unwrap();
        assert_eq!(queue.admit(1), Ok(true));
        let err = queue.admit_batch(vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            QueueError::CapacityExceeded {
                requested: 3,
                remaining: 1
            }
        );
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.remaining_capacity(), 1);
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        assert!(matches!(
            SingleConsumerQueue::<u8>::with_capacity(0),
            Err(QueueError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_capacity() {
        let queue = SingleConsumerQueue::<u8>::new();
        assert_eq!(queue.capacity(), DEFAULT_CAPACITY);
        assert_eq!(queue.remaining_capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_consumed_slots_are_reusable() {
        let queue = SingleConsumerQueue::with_capacity(2).unwrap();
        assert_eq!(queue.admit_batch(vec![1, 2]), Ok(true));
        assert!(queue.admit(3).is_err());
        assert_eq!(queue.blocking_take(), Ok(Some(1)));
        assert_eq!(queue.admit(3), Ok(true));
        assert_eq!(queue.peek(), Some(2));
    }

    #[test]
    fn test_shutdown_rejects_and_drains() {
        let queue = SingleConsumerQueue::with_capacity(5).unwrap();
        assert_eq!(queue.admit_batch(vec!["a", "b", "c"]), Ok(true));
        assert_eq!(queue.shutdown(), vec!["a", "b", "c"]);
        assert!(queue.is_empty());
        assert_eq!(queue.state(), QueueState::Stopped);
        assert_eq!(queue.admit("d"), Ok(false));
        assert!(queue.shutdown().is_empty());
    }

    #[test]
    fn test_take_timeout_on_empty_queue() {
        let queue = SingleConsumerQueue::<u8>::with_capacity(1).unwrap();
        assert_eq!(queue.take_timeout(Duration::from_millis(20)), Ok(None));
        assert!(!queue.has_active_consumer());
    }

    #[test]
    fn test_pending_interrupt_surfaces_as_error() {
        let queue = SingleConsumerQueue::<u8>::with_capacity(1).unwrap();
        queue.interrupt_consumer("stop requested");
        assert_eq!(
            queue.blocking_take(),
            Err(QueueError::Interrupted("stop requested".into()))
        );
        assert!(!queue.has_active_consumer());
    }

    #[test]
    fn test_capacity_events() {
        let sink = Arc::new(InMemoryEventSink::new(8));
        let queue = SingleConsumerQueue::with_capacity(1)
            .unwrap()
            .with_event_sink(sink.clone());
        assert!(queue.admit_batch(vec![1, 2]).is_err());
        assert_eq!(
            sink.kinds(),
            vec![QueueEventKind::CapacityExhausted {
                requested: 2,
                remaining: 1
            }]
        );
    }
}
