//! Core queue abstractions: admission, capacity accounting, consumer
//! exclusivity and the shutdown protocol.

pub mod admission;
pub mod capacity;
pub mod consumer;
pub mod error;
pub mod events;
pub mod single_consumer;
pub mod stoppable;
pub mod task;

pub use admission::{AdmissionGate, AdmissionTicket, QueueState, ShutdownRole};
pub use capacity::{CapacityAccountant, Reservation};
pub use consumer::{ConsumerGate, ConsumerToken};
pub use error::{AppResult, QueueError};
pub use events::{
    build_queue_event, InMemoryEventSink, NoopEventSink, QueueEvent, QueueEventKind,
    QueueEventSink,
};
pub use single_consumer::{SingleConsumerQueue, DEFAULT_CAPACITY};
pub use stoppable::StoppableTaskQueue;
pub use task::PriorityTask;
