//! Tests for runtime adapters

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use prometheus_task_queue::core::SingleConsumerQueue;
use prometheus_task_queue::runtime::{spawn_consumer, take_async};

#[test]
fn test_consumer_thread_sums_tasks() {
    let queue = Arc::new(SingleConsumerQueue::with_capacity(100).unwrap());
    let total = Arc::new(AtomicU64::new(0));
    let handle = {
        let total = Arc::clone(&total);
        spawn_consumer(Arc::clone(&queue), "sum-consumer", move |n: u64| {
            total.fetch_add(n, Ordering::SeqCst);
        })
        .unwrap()
    };

    assert_eq!(queue.admit_batch((1..=10).collect()), Ok(true));
    while total.load(Ordering::SeqCst) < 55 {
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(handle.stop("done"), Ok(10));
}

#[test]
fn test_second_consumer_thread_exits_busy() {
    let queue = Arc::new(SingleConsumerQueue::<u8>::with_capacity(4).unwrap());
    let first = spawn_consumer(Arc::clone(&queue), "first", |_| {}).unwrap();
    while !queue.has_active_consumer() {
        std::thread::yield_now();
    }
    let second = spawn_consumer(Arc::clone(&queue), "second", |_| {}).unwrap();
    while !second.is_finished() {
        std::thread::sleep(Duration::from_millis(1));
    }
    assert!(second.stop("unused").is_err());

    // `first` is still servicing the queue.
    assert_eq!(queue.admit(9), Ok(true));
    while !queue.is_empty() {
        std::thread::sleep(Duration::from_millis(1));
    }
    assert!(!first.is_finished());
    assert_eq!(first.stop("done"), Ok(1));
}

#[tokio::test]
async fn test_take_async_across_runtime() {
    let queue = Arc::new(SingleConsumerQueue::with_capacity(2).unwrap());
    assert_eq!(queue.admit("ready"), Ok(true));
    assert_eq!(take_async(queue).await, Ok(Some("ready")));
}
