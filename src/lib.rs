//! # Prometheus Task Queue
//!
//! Stoppable, capacity-bounded task admission queues with graceful shutdown.
//!
//! Many producer threads admit tasks, a single long-lived consumer takes them,
//! and one operator thread eventually shuts the queue down. Shutdown is
//! graceful: it stops new admissions, lets admissions already in progress
//! finish, then drains the queue and returns every task nobody consumed.
//!
//! ## Key Features
//!
//! - **Atomic batch admission**: a batch is either fully visible to the consumer or not at all
//! - **Race-free capacity control**: concurrent producers can never jointly overshoot the bound
//! - **Graceful shutdown**: in-flight admissions complete, later ones are rejected, nothing is lost
//! - **Single-consumer exclusivity**: one blocking waiter; extra callers return immediately
//! - **Priority ordering**: deterministic `(priority, task)` order for the unbounded variant
//!
//! ## StoppableTaskQueue - Priority Ordering
//!
//! ```rust
//! use prometheus_task_queue::core::{PriorityTask, StoppableTaskQueue};
//!
//! let queue = StoppableTaskQueue::new();
//! queue.admit(PriorityTask::low("b"));
//! queue.admit(PriorityTask::high("a"));
//! queue.admit(PriorityTask::low("a"));
//!
//! assert_eq!(queue.poll(), Some(PriorityTask::high("a")));
//! assert_eq!(queue.poll(), Some(PriorityTask::low("a")));
//! assert_eq!(queue.shutdown(), vec![PriorityTask::low("b")]);
//! ```
//!
//! ## SingleConsumerQueue - Bounded FIFO
//!
//! ```rust
//! use std::sync::Arc;
//! use prometheus_task_queue::core::{QueueError, SingleConsumerQueue};
//! use prometheus_task_queue::runtime::spawn_consumer;
//!
//! # fn main() -> Result<(), QueueError> {
//! let queue = Arc::new(SingleConsumerQueue::with_capacity(10)?);
//! let consumer = spawn_consumer(Arc::clone(&queue), "consumer", |task: u32| {
//!     println!("processing {task}");
//! })?;
//!
//! assert!(queue.admit_batch(vec![1, 2, 3])?);
//! let err = queue.admit_batch((0..20).collect()).unwrap_err();
//! assert!(matches!(err, QueueError::CapacityExceeded { requested: 20, .. }));
//!
//! consumer.stop("shutting down")?;
//! let _unprocessed = queue.shutdown();
//! assert!(!queue.admit(4)?);
//! # Ok(())
//! # }
//! ```
//!
//! For complete examples, see:
//! - `tests/graceful_shutdown_test.rs` - shutdown racing producers
//! - `tests/single_consumer_test.rs` - capacity and consumer exclusivity

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core queue abstractions, admission and shutdown.
pub mod core;
/// Configuration models for queues.
pub mod config;
/// Builders to construct queues from configuration.
pub mod builders;
/// Task stores backing the queues.
pub mod infra;
/// Runtime adapters: consumer thread and tokio bridge.
pub mod runtime;
/// Shared utilities.
pub mod util;
