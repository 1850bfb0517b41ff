//! Tests for error types

use prometheus_task_queue::core::QueueError;

#[test]
fn test_capacity_exceeded_error() {
    let err = QueueError::CapacityExceeded {
        requested: 3,
        remaining: 2,
    };
    assert_eq!(
        format!("{}", err),
        "tasks queue is full: remaining capacity 2, requested 3"
    );
}

#[test]
fn test_interrupted_error() {
    let err = QueueError::Interrupted("operator stop".to_string());
    assert_eq!(
        format!("{}", err),
        "interrupted while waiting for a task: operator stop"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = QueueError::InvalidConfig("capacity must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: capacity must be greater than 0"
    );
}

#[test]
fn test_internal_error() {
    let err = QueueError::Internal("consumer thread panicked".to_string());
    assert_eq!(format!("{}", err), "internal error: consumer thread panicked");
}
