//! Bounded FIFO store with blocking removal.
//!
//! A `VecDeque` guarded by one mutex, with a `not_empty` condition variable
//! for the consumer. Tasks enter only through [`TaskStore::push_all`], after
//! the queue has reserved room for them. Consumers blocked in
//! [`BoundedStore::take`] can be cancelled with [`BoundedStore::interrupt`].

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::TaskStore;
use crate::core::QueueError;

struct Slots<T> {
    items: VecDeque<T>,
    /// One-shot cancellation, consumed by the next blocking take.
    interrupt: Option<String>,
}

/// Insertion-ordered store holding at most `capacity` tasks.
pub struct BoundedStore<T> {
    capacity: usize,
    slots: Mutex<Slots<T>>,
    not_empty: Condvar,
}

impl<T> BoundedStore<T> {
    /// Create an empty store. `capacity` must be non-zero.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or_else(|| QueueError::InvalidConfig("store capacity must be greater than 0".into()))
    }

    /// Create an empty store holding at most `capacity` tasks.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        Self {
            capacity,
            slots: Mutex::new(Slots {
                items: VecDeque::with_capacity(capacity.min(1024)),
                interrupt: None,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Maximum number of stored tasks.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots right now. Does not account for reservations.
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.slots.lock().items.len()
    }

    /// Remove the head, blocking until one is available.
    ///
    /// Returns [`QueueError::Interrupted`] if an interrupt is pending or
    /// arrives while waiting; the interrupt is consumed.
    pub fn take(&self) -> Result<T, QueueError> {
        let mut slots = self.slots.lock();
        loop {
            if let Some(cause) = slots.interrupt.take() {
                return Err(QueueError::Interrupted(cause));
            }
            if let Some(item) = slots.items.pop_front() {
                return Ok(item);
            }
            self.not_empty.wait(&mut slots);
        }
    }

    /// Like [`take`](Self::take) but gives up after `timeout`, returning `Ok(None)`.
    pub fn take_timeout(&self, timeout: Duration) -> Result<Option<T>, QueueError> {
        let deadline = Instant::now() + timeout;
        let mut slots = self.slots.lock();
        loop {
            if let Some(cause) = slots.interrupt.take() {
                return Err(QueueError::Interrupted(cause));
            }
            if let Some(item) = slots.items.pop_front() {
                return Ok(Some(item));
            }
            if self.not_empty.wait_until(&mut slots, deadline).timed_out() {
                return Ok(slots.items.pop_front());
            }
        }
    }

    /// Cancel the current (or next) blocking [`take`](Self::take).
    pub fn interrupt(&self, cause: impl Into<String>) {
        let mut slots = self.slots.lock();
        slots.interrupt = Some(cause.into());
        self.not_empty.notify_all();
    }

    /// Clear an interrupt no take has consumed yet, returning its cause.
    pub(crate) fn withdraw_interrupt(&self) -> Option<String> {
        self.slots.lock().interrupt.take()
    }
}

impl<T: Clone> BoundedStore<T> {
    /// Clone of the head element, if any.
    pub fn peek(&self) -> Option<T> {
        self.slots.lock().items.front().cloned()
    }
}

impl<T> TaskStore<T> for BoundedStore<T> {
    fn push_all(&self, tasks: Vec<T>) -> Result<(), Vec<T>> {
        let mut slots = self.slots.lock();
        if slots.items.len() + tasks.len() > self.capacity {
            return Err(tasks);
        }
        slots.items.extend(tasks);
        self.not_empty.notify_all();
        Ok(())
    }

    fn drain_all(&self) -> Vec<T> {
        let mut slots = self.slots.lock();
        slots.items.drain(..).collect()
    }

    fn len(&self) -> usize {
        self.slots.lock().items.len()
    }
}

impl<T> std::fmt::Debug for BoundedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedStore")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
