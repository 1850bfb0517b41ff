//! Dedicated consumer thread for a [`SingleConsumerQueue`].
//!
//! The queue is designed for one long-lived consumer. This module runs it on
//! its own named OS thread so CPU-bound handlers never block an async runtime.
//! The loop ends when the blocking take is interrupted.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::core::{QueueError, SingleConsumerQueue};

/// Handle to a running consumer thread.
pub struct ConsumerHandle<T> {
    queue: Arc<SingleConsumerQueue<T>>,
    thread: JoinHandle<Result<u64, QueueError>>,
}

/// Spawn the consumer loop on a thread called `thread_name`, passing every
/// taken task to `handler`.
///
/// The thread exits with the number of processed tasks once interrupted
/// (see [`ConsumerHandle::stop`]). If another consumer already holds the
/// queue's token the thread exits immediately with [`QueueError::Internal`].
pub fn spawn_consumer<T, F>(
    queue: Arc<SingleConsumerQueue<T>>,
    thread_name: impl Into<String>,
    mut handler: F,
) -> Result<ConsumerHandle<T>, QueueError>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    let worker_queue = Arc::clone(&queue);
    let thread = thread::Builder::new()
        .name(thread_name.into())
        .spawn(move || {
            let queue_id = worker_queue.id();
            debug!(queue = %queue_id, "consumer thread started");
            let mut processed = 0_u64;
            loop {
                match worker_queue.blocking_take() {
                    Ok(Some(task)) => {
                        handler(task);
                        processed += 1;
                    }
                    Ok(None) => {
                        warn!(queue = %queue_id, "another consumer is already servicing the queue");
                        return Err(QueueError::Internal(
                            "another consumer is already servicing the queue".into(),
                        ));
                    }
                    Err(QueueError::Interrupted(cause)) => {
                        info!(queue = %queue_id, %cause, processed, "consumer thread stopped");
                        return Ok(processed);
                    }
                    Err(err) => return Err(err),
                }
            }
        })
        .map_err(|e| QueueError::Internal(format!("failed to spawn consumer thread: {e}")))?;

    Ok(ConsumerHandle { queue, thread })
}

impl<T> ConsumerHandle<T> {
    /// Interrupt the consumer and wait for its thread to exit.
    ///
    /// Returns the number of tasks the handler processed. Tasks still queued
    /// stay in the queue; call [`SingleConsumerQueue::shutdown`] to collect them.
    /// A thread that already exited (busy queue, panicking handler) is only
    /// joined; no interrupt is left behind for another consumer.
    pub fn stop(self, cause: impl Into<String>) -> Result<u64, QueueError> {
        let interrupted = !self.thread.is_finished();
        if interrupted {
            self.queue.interrupt_consumer(cause);
        }
        let outcome = match self.thread.join() {
            Ok(outcome) => outcome,
            Err(_) => Err(QueueError::Internal("consumer thread panicked".into())),
        };
        // Only an interrupted take ends the loop with `Ok`.
        if interrupted && outcome.is_err() {
            if let Some(cause) = self.queue.withdraw_interrupt() {
                debug!(queue = %self.queue.id(), %cause, "withdrew unconsumed interrupt");
            }
        }
        outcome
    }

    /// `true` once the consumer thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

impl<T> std::fmt::Debug for ConsumerHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerHandle")
            .field("queue", &self.queue.id())
            .field("thread", &self.thread.thread().name())
            .finish()
    }
}
