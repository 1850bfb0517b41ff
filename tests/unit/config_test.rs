//! Tests for configuration validation

use prometheus_task_queue::config::{QueueConfig, QueueKind};
use prometheus_task_queue::core::DEFAULT_CAPACITY;

#[test]
fn test_queue_config_defaults() {
    let config = QueueConfig::default();
    assert_eq!(config.kind, QueueKind::BoundedFifo);
    assert_eq!(config.capacity, DEFAULT_CAPACITY);
    assert!(config.validate().is_ok());
}

#[test]
fn test_queue_config_invalid_capacity() {
    let invalid = QueueConfig::default().with_capacity(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_queue_config_invalid_thread_name() {
    let invalid = QueueConfig::default().with_consumer_thread_name("  ");
    assert!(invalid.validate().is_err());
}

#[test]
fn test_queue_config_from_json() {
    let json = r#"{
        "kind": "bounded_fifo",
        "capacity": 250,
        "consumer_thread_name": "ingest-consumer"
    }"#;

    let config = QueueConfig::from_json_str(json).unwrap();
    assert_eq!(config.kind, QueueKind::BoundedFifo);
    assert_eq!(config.capacity, 250);
    assert_eq!(config.consumer_thread_name, "ingest-consumer");
}

#[test]
fn test_queue_config_from_json_defaults_missing_fields() {
    let config = QueueConfig::from_json_str(r#"{ "kind": "priority" }"#).unwrap();
    assert_eq!(config.kind, QueueKind::Priority);
    assert_eq!(config.capacity, DEFAULT_CAPACITY);
}

#[test]
fn test_queue_config_from_json_rejects_zero_capacity() {
    assert!(QueueConfig::from_json_str(r#"{ "capacity": 0 }"#).is_err());
    assert!(QueueConfig::from_json_str("not json").is_err());
}

#[test]
fn test_queue_kind_from_str() {
    assert_eq!("priority".parse::<QueueKind>().unwrap(), QueueKind::Priority);
    assert_eq!("FIFO".parse::<QueueKind>().unwrap(), QueueKind::BoundedFifo);
    assert!("lifo".parse::<QueueKind>().is_err());
}
