//! Queue event observers.
//!
//! Queues report admissions, rejections, capacity exhaustion and shutdown
//! progress to an optional [`QueueEventSink`]. Sinks are informational only:
//! nothing they do can influence queue behavior.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::serde::QueueId;

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QueueEventKind {
    /// A batch was admitted.
    Admitted {
        /// Tasks in the batch.
        count: usize,
    },
    /// A batch was refused because the queue is shutting down.
    Rejected {
        /// Tasks in the batch.
        count: usize,
    },
    /// A batch did not fit into the bounded queue.
    CapacityExhausted {
        /// Tasks in the batch.
        requested: usize,
        /// Free capacity at the time of the check.
        remaining: usize,
    },
    /// A blocking take was refused because another consumer holds the token.
    ConsumerBusy,
    /// Shutdown flipped the queue to stopping.
    ShutdownStarted,
    /// Shutdown drained the store.
    ShutdownCompleted {
        /// Unprocessed tasks handed back to the caller.
        drained: usize,
    },
}

/// Event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent {
    /// Queue that emitted the event.
    pub queue: QueueId,
    /// Event payload.
    pub kind: QueueEventKind,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Event sink abstraction.
pub trait QueueEventSink: Send + Sync {
    /// Record an event. Must not block for long; called on producer and
    /// consumer threads.
    fn record(&self, event: QueueEvent);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl QueueEventSink for NoopEventSink {
    fn record(&self, _event: QueueEvent) {}
}

/// In-memory sink for testing and dev, keeping the most recent events.
#[derive(Debug)]
pub struct InMemoryEventSink {
    events: Mutex<VecDeque<QueueEvent>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a sink with a bounded buffer; the oldest event is evicted first.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(1024))),
            max_events,
        }
    }

    /// Snapshot of stored events, oldest first.
    pub fn events(&self) -> Vec<QueueEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Snapshot of stored event kinds, oldest first.
    pub fn kinds(&self) -> Vec<QueueEventKind> {
        self.events.lock().iter().map(|e| e.kind.clone()).collect()
    }
}

impl QueueEventSink for InMemoryEventSink {
    fn record(&self, event: QueueEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to stamp an event with the current time.
pub fn build_queue_event(queue: QueueId, kind: QueueEventKind) -> QueueEvent {
    QueueEvent {
        queue,
        kind,
        created_at_ms: now_ms(),
    }
}

/// Forward an event to `sink`, if one is attached.
pub(crate) fn emit(sink: Option<&Arc<dyn QueueEventSink>>, queue: QueueId, kind: QueueEventKind) {
    if let Some(sink) = sink {
        sink.record(build_queue_event(queue, kind));
    }
}
