//! Task model: a payload paired with its priority.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::util::serde::Priority;

/// A task tagged with a [`Priority`].
///
/// Ordering is `(priority, task)`: priority first, then the task's own natural
/// order as a deterministic tie-break. Two tasks with equal priority therefore
/// always compare the same way, whatever order they were admitted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriorityTask<T> {
    /// Primary sort key.
    pub priority: Priority,
    /// Payload; its `Ord` breaks ties.
    pub task: T,
}

impl<T> PriorityTask<T> {
    /// Pair a task with a priority.
    pub const fn new(priority: Priority, task: T) -> Self {
        Self { priority, task }
    }

    /// Shorthand for [`Priority::High`].
    pub const fn high(task: T) -> Self {
        Self::new(Priority::High, task)
    }

    /// Shorthand for [`Priority::Medium`].
    pub const fn medium(task: T) -> Self {
        Self::new(Priority::Medium, task)
    }

    /// Shorthand for [`Priority::Low`].
    pub const fn low(task: T) -> Self {
        Self::new(Priority::Low, task)
    }

    /// Discard the priority and return the payload.
    pub fn into_task(self) -> T {
        self.task
    }
}

impl<T: Ord> PartialOrd for PriorityTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for PriorityTask<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.task.cmp(&other.task))
    }
}
