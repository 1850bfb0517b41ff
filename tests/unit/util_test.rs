//! Tests for utility functions

use prometheus_task_queue::core::PriorityTask;
use prometheus_task_queue::util::{now_ms, Priority, QueueId};

#[test]
fn test_priority_ordering() {
    assert!(Priority::High < Priority::Medium);
    assert!(Priority::Medium < Priority::Low);
}

#[test]
fn test_priority_display() {
    assert_eq!(Priority::High.to_string(), "high");
    assert_eq!(Priority::Low.to_string(), "low");
}

#[test]
fn test_priority_task_ordering() {
    let a = PriorityTask::new(Priority::Low, "a");
    let b = PriorityTask::new(Priority::Low, "b");
    let urgent = PriorityTask::new(Priority::High, "z");
    assert!(urgent < a);
    assert!(a < b);
    assert_eq!(a.clone().into_task(), "a");
}

#[test]
fn test_queue_id_display_is_uuid() {
    let id = QueueId::new();
    assert_eq!(id.to_string().len(), 36);
}

#[test]
fn test_now_ms() {
    assert!(now_ms() > 0);
}

#[test]
fn test_init_tracing_is_idempotent() {
    prometheus_task_queue::util::init_tracing();
    prometheus_task_queue::util::init_tracing();
    tracing::info!("tracing initialised twice without panicking");
}
