//! Bridge between async callers and the blocking queue operations.
//!
//! Blocking waits run on tokio's blocking pool so they never stall a runtime
//! worker. Dropping the returned future does not cancel the wait: interrupt
//! the consumer through [`SingleConsumerQueue::interrupt_consumer`] instead.

use std::sync::Arc;
use std::time::Duration;

use crate::core::{QueueError, SingleConsumerQueue};

fn join_error(e: &tokio::task::JoinError) -> QueueError {
    QueueError::Internal(format!("blocking queue task failed: {e}"))
}

/// Async form of [`SingleConsumerQueue::blocking_take`].
pub async fn take_async<T>(queue: Arc<SingleConsumerQueue<T>>) -> Result<Option<T>, QueueError>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || queue.blocking_take())
        .await
        .map_err(|e| join_error(&e))?
}

/// Async form of [`SingleConsumerQueue::take_timeout`].
pub async fn take_timeout_async<T>(
    queue: Arc<SingleConsumerQueue<T>>,
    timeout: Duration,
) -> Result<Option<T>, QueueError>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || queue.take_timeout(timeout))
        .await
        .map_err(|e| join_error(&e))?
}

/// Async form of [`SingleConsumerQueue::shutdown`].
pub async fn shutdown_async<T>(queue: Arc<SingleConsumerQueue<T>>) -> Result<Vec<T>, QueueError>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || queue.shutdown())
        .await
        .map_err(|e| join_error(&e))
}
