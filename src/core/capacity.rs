//! Capacity accounting for bounded queues.
//!
//! A producer must reserve room for its whole batch before touching the store.
//! The check against free space and the increment of the reserved counter
//! happen under one mutex, so two producers can never both observe enough
//! room and then jointly overshoot the bound.

use parking_lot::Mutex;

use crate::core::QueueError;

/// Tracks capacity promised to producers but not yet occupied in the store.
#[derive(Debug)]
pub struct CapacityAccountant {
    capacity: usize,
    reserved: Mutex<usize>,
}

impl CapacityAccountant {
    /// Create an accountant for a store holding at most `capacity` tasks.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            reserved: Mutex::new(0),
        }
    }

    /// Reserve room for `n` tasks.
    ///
    /// `occupied` reports how many tasks the store currently holds; it is
    /// evaluated inside the critical section. On failure nothing changes and
    /// the error carries the capacity that was free at the time of the check.
    pub fn reserve<F>(&self, n: usize, occupied: F) -> Result<Reservation<'_>, QueueError>
    where
        F: FnOnce() -> usize,
    {
        let mut reserved = self.reserved.lock();
        let remaining = self
            .capacity
            .saturating_sub(occupied())
            .saturating_sub(*reserved);
        if n > remaining {
            return Err(QueueError::CapacityExceeded {
                requested: n,
                remaining,
            });
        }
        *reserved += n;
        Ok(Reservation {
            accountant: self,
            units: n,
        })
    }

    /// Capacity promised to producers that have not committed yet.
    pub fn reserved(&self) -> usize {
        *self.reserved.lock()
    }

    /// Fixed capacity of the store.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(&self, units: usize) {
        if units > 0 {
            *self.reserved.lock() -= units;
        }
    }
}

/// Outstanding claim on `units` slots.
///
/// Store the tasks through [`commit_with`](Self::commit_with); the reservation
/// then becomes occupied space. Dropping without committing returns the slots
/// unused. Either way the counter is decremented once.
#[must_use = "an uncommitted reservation is released when dropped"]
#[derive(Debug)]
pub struct Reservation<'a> {
    accountant: &'a CapacityAccountant,
    units: usize,
}

impl Reservation<'_> {
    /// Number of slots held.
    pub const fn units(&self) -> usize {
        self.units
    }

    /// Run `store` and release the reservation while the accountant is
    /// locked, so a concurrent [`CapacityAccountant::reserve`] never counts
    /// the stored tasks as both occupied and reserved.
    ///
    /// `store` must not call back into this accountant.
    pub fn commit_with<R>(mut self, store: impl FnOnce() -> R) -> R {
        let stored = {
            let mut reserved = self.accountant.reserved.lock();
            let stored = store();
            *reserved -= self.units;
            stored
        };
        self.units = 0;
        stored
    }

    /// Release the reservation without storing anything through it.
    pub fn commit(self) {
        self.commit_with(|| ());
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.accountant.release(self.units);
    }
}
