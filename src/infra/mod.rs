//! Infrastructure: the task stores backing the queues.

pub mod queue;

pub use queue::{BoundedStore, PriorityStore, TaskStore};
