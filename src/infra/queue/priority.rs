//! Unbounded priority store backed by a binary heap.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use parking_lot::Mutex;

use super::TaskStore;

/// Priority-ordered store: [`poll`](Self::poll) yields the minimum element.
/// This provides O(log n) insertion and removal.
#[derive(Debug)]
pub struct PriorityStore<T> {
    /// `Reverse` turns the max-heap into a min-heap.
    heap: Mutex<BinaryHeap<Reverse<T>>>,
}

impl<T: Ord> PriorityStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
        }
    }

    /// Insert every task under a single lock acquisition.
    pub fn extend<I>(&self, tasks: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.heap.lock().extend(tasks.into_iter().map(Reverse));
    }

    /// Remove and return the smallest element, or `None` if empty. Never blocks
    /// beyond the store's short critical section.
    pub fn poll(&self) -> Option<T> {
        self.heap.lock().pop().map(|Reverse(t)| t)
    }
}

impl<T: Ord + Clone> PriorityStore<T> {
    /// Clone of the element [`poll`](Self::poll) would return next.
    pub fn peek(&self) -> Option<T> {
        self.heap.lock().peek().map(|Reverse(t)| t.clone())
    }
}

impl<T: Ord> Default for PriorityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> TaskStore<T> for PriorityStore<T> {
    fn push_all(&self, tasks: Vec<T>) -> Result<(), Vec<T>> {
        self.extend(tasks);
        Ok(())
    }

    /// Drained tasks come back in poll order (ascending).
    fn drain_all(&self) -> Vec<T> {
        let heap = std::mem::take(&mut *self.heap.lock());
        heap.into_sorted_vec()
            .into_iter()
            .rev()
            .map(|Reverse(t)| t)
            .collect()
    }

    fn len(&self) -> usize {
        self.heap.lock().len()
    }
}
