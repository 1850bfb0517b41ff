//! Builder constructing queues from configuration.

use std::sync::Arc;

use tracing::debug;

use crate::config::{QueueConfig, QueueKind};
use crate::core::{QueueError, QueueEventSink, SingleConsumerQueue, StoppableTaskQueue};
use crate::runtime::{spawn_consumer, ConsumerHandle};

/// Builds a named queue from a [`QueueConfig`].
pub struct QueueBuilder {
    name: String,
    config: QueueConfig,
    events: Option<Arc<dyn QueueEventSink>>,
}

impl QueueBuilder {
    /// Start a builder for the queue called `name`.
    pub fn new(name: impl Into<String>, config: QueueConfig) -> Self {
        Self {
            name: name.into(),
            config,
            events: None,
        }
    }

    /// Attach an event sink to the built queue.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn QueueEventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Queue name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the queue will be built from.
    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    fn check_kind(&self, expected: QueueKind) -> Result<(), QueueError> {
        self.config
            .validate()
            .map_err(|e| QueueError::InvalidConfig(format!("queue `{}` invalid: {e}", self.name)))?;
        if self.config.kind != expected {
            return Err(QueueError::InvalidConfig(format!(
                "queue `{}` is configured as {:?}, not {expected:?}",
                self.name, self.config.kind
            )));
        }
        Ok(())
    }

    /// Build the unbounded priority queue. The configured kind must be
    /// [`QueueKind::Priority`].
    pub fn build_priority<T: Ord>(self) -> Result<StoppableTaskQueue<T>, QueueError> {
        self.check_kind(QueueKind::Priority)?;
        let queue = StoppableTaskQueue::new();
        debug!(name = %self.name, queue = %queue.id(), "built priority queue");
        Ok(match self.events {
            Some(sink) => queue.with_event_sink(sink),
            None => queue,
        })
    }

    /// Build the bounded single-consumer queue. The configured kind must be
    /// [`QueueKind::BoundedFifo`].
    pub fn build_single_consumer<T>(self) -> Result<SingleConsumerQueue<T>, QueueError> {
        self.check_kind(QueueKind::BoundedFifo)?;
        let queue = SingleConsumerQueue::with_capacity(self.config.capacity)?;
        debug!(name = %self.name, queue = %queue.id(), "built single-consumer queue");
        Ok(match self.events {
            Some(sink) => queue.with_event_sink(sink),
            None => queue,
        })
    }

    /// Build the bounded single-consumer queue and start its consumer on a
    /// thread named by [`QueueConfig::consumer_thread_name`].
    pub fn build_with_consumer<T, F>(
        self,
        handler: F,
    ) -> Result<(Arc<SingleConsumerQueue<T>>, ConsumerHandle<T>), QueueError>
    where
        T: Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let thread_name = self.config.consumer_thread_name.clone();
        let queue = Arc::new(self.build_single_consumer()?);
        let consumer = spawn_consumer(Arc::clone(&queue), thread_name.as_str(), handler)?;
        debug!(queue = %queue.id(), thread = %thread_name, "started consumer thread");
        Ok((queue, consumer))
    }
}

impl std::fmt::Debug for QueueBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueBuilder")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("has_event_sink", &self.events.is_some())
            .finish()
    }
}
