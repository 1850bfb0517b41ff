//! Tests for queue event sinks

use std::sync::Arc;

use prometheus_task_queue::core::{
    build_queue_event, InMemoryEventSink, NoopEventSink, QueueEventKind, QueueEventSink,
    SingleConsumerQueue,
};
use prometheus_task_queue::util::QueueId;

#[test]
fn test_in_memory_event_sink() {
    let sink = InMemoryEventSink::new(10);
    let id = QueueId::new();

    sink.record(build_queue_event(id, QueueEventKind::Admitted { count: 3 }));
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].queue, id);
    assert_eq!(events[0].kind, QueueEventKind::Admitted { count: 3 });
    assert!(events[0].created_at_ms > 0);
}

#[test]
fn test_event_sink_overflow() {
    let sink = InMemoryEventSink::new(2);
    let id = QueueId::new();

    sink.record(build_queue_event(id, QueueEventKind::Admitted { count: 1 }));
    sink.record(build_queue_event(id, QueueEventKind::Rejected { count: 2 }));
    sink.record(build_queue_event(id, QueueEventKind::ConsumerBusy));

    assert_eq!(
        sink.kinds(),
        vec![QueueEventKind::Rejected { count: 2 }, QueueEventKind::ConsumerBusy]
    );
}

#[test]
fn test_noop_sink_does_not_affect_queue() {
    let queue = SingleConsumerQueue::with_capacity(2)
        .unwrap()
        .with_event_sink(Arc::new(NoopEventSink));
    assert_eq!(queue.admit(1), Ok(true));
    assert_eq!(queue.shutdown(), vec![1]);
}

#[test]
fn test_shutdown_lifecycle_events() {
    let sink = Arc::new(InMemoryEventSink::new(10));
    let queue = SingleConsumerQueue::with_capacity(4)
        .unwrap()
        .with_event_sink(sink.clone());
    let id = queue.id();

    assert_eq!(queue.admit_batch(vec!["a", "b"]), Ok(true));
    assert_eq!(queue.shutdown().len(), 2);
    assert_eq!(queue.admit("c"), Ok(false));

    let events = sink.events();
    assert!(events.iter().all(|e| e.queue == id));
    assert_eq!(
        sink.kinds(),
        vec![
            QueueEventKind::Admitted { count: 2 },
            QueueEventKind::ShutdownStarted,
            QueueEventKind::ShutdownCompleted { drained: 2 },
            QueueEventKind::Rejected { count: 1 },
        ]
    );
}
