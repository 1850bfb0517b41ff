//! Tests for builder modules

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use prometheus_task_queue::builders::QueueBuilder;
use prometheus_task_queue::config::{QueueConfig, QueueKind};
use prometheus_task_queue::core::{InMemoryEventSink, PriorityTask, QueueError, QueueEventKind};

#[test]
fn test_queue_builder_accessors() {
    let config = QueueConfig::default().with_capacity(50);
    let builder = QueueBuilder::new("ingest", config);
    assert_eq!(builder.name(), "ingest");
    assert_eq!(builder.config().capacity, 50);
}

#[test]
fn test_build_with_consumer_names_thread() {
    let config = QueueConfig::default()
        .with_capacity(4)
        .with_consumer_thread_name("ingest-consumer");
    let (tx, rx) = mpsc::channel();
    let (queue, consumer) = QueueBuilder::new("ingest", config)
        .build_with_consumer(move |task: u32| {
            let name = thread::current().name().map(str::to_owned);
            tx.send((task, name)).unwrap();
        })
        .unwrap();

    assert_eq!(queue.admit(7), Ok(true));
    let (task, name) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(task, 7);
    assert_eq!(name.as_deref(), Some("ingest-consumer"));
    assert_eq!(consumer.stop("done"), Ok(1));
}

#[test]
fn test_build_single_consumer_queue() {
    let config = QueueConfig::default().with_capacity(3);
    let queue = QueueBuilder::new("fifo", config)
        .build_single_consumer::<u32>()
        .unwrap();
    assert_eq!(queue.capacity(), 3);
    assert!(queue.admit_batch(vec![1, 2, 3, 4]).is_err());
}

#[test]
fn test_build_priority_queue_with_events() {
    let sink = Arc::new(InMemoryEventSink::new(8));
    let config = QueueConfig::default().with_kind(QueueKind::Priority);
    let queue = QueueBuilder::new("prio", config)
        .with_event_sink(sink.clone())
        .build_priority::<&str>()
        .unwrap();
    assert!(queue.admit(PriorityTask::high("a")));
    assert_eq!(sink.kinds(), vec![QueueEventKind::Admitted { count: 1 }]);
}

#[test]
fn test_builder_rejects_mismatched_kind() {
    let config = QueueConfig::default().with_kind(QueueKind::Priority);
    let err = QueueBuilder::new("prio", config)
        .build_single_consumer::<u32>()
        .unwrap_err();
    assert!(matches!(err, QueueError::InvalidConfig(_)));
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = QueueConfig::default().with_capacity(0);
    let err = QueueBuilder::new("broken", config)
        .build_single_consumer::<u32>()
        .unwrap_err();
    assert!(err.to_string().contains("queue `broken` invalid"));
}
