//! Task stores: the buffers admitted tasks live in until consumed or drained.

pub mod bounded;
pub mod priority;

pub use bounded::BoundedStore;
pub use priority::PriorityStore;

/// Storage backend shared by the queue front-ends.
///
/// Implementations synchronize internally; every method takes `&self`.
pub trait TaskStore<T> {
    /// Insert a whole batch so that either all of it or none of it is visible
    /// to consumers. Returns the batch untouched if it cannot be stored.
    fn push_all(&self, tasks: Vec<T>) -> Result<(), Vec<T>>;
    /// Atomically remove and return every stored task, in store order.
    fn drain_all(&self) -> Vec<T>;
    /// Number of stored tasks.
    fn len(&self) -> usize;
    /// `true` when no task is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
