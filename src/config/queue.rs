//! Queue configuration structures.

use std::env;

use serde::{Deserialize, Serialize};

use crate::core::{QueueError, DEFAULT_CAPACITY};

/// Environment variable selecting the queue kind (`priority` or `bounded_fifo`).
pub const ENV_KIND: &str = "TASK_QUEUE_KIND";
/// Environment variable holding the bounded queue capacity.
pub const ENV_CAPACITY: &str = "TASK_QUEUE_CAPACITY";
/// Environment variable naming the dedicated consumer thread.
pub const ENV_CONSUMER_THREAD: &str = "TASK_QUEUE_CONSUMER_THREAD";

/// Which queue front-end to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// Unbounded priority queue with non-blocking polling.
    Priority,
    /// Capacity-bounded FIFO queue with a single blocking consumer.
    #[default]
    BoundedFifo,
}

impl std::str::FromStr for QueueKind {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "bounded_fifo" | "fifo" => Ok(Self::BoundedFifo),
            other => Err(QueueError::InvalidConfig(format!("unknown queue kind `{other}`"))),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_consumer_thread_name() -> String {
    "task-queue-consumer".into()
}

/// Queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue front-end.
    #[serde(default)]
    pub kind: QueueKind,
    /// Maximum stored tasks (bounded FIFO only).
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Name of the consumer thread started by `QueueBuilder::build_with_consumer`.
    #[serde(default = "default_consumer_thread_name")]
    pub consumer_thread_name: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            kind: QueueKind::default(),
            capacity: default_capacity(),
            consumer_thread_name: default_consumer_thread_name(),
        }
    }
}

impl QueueConfig {
    /// Set the queue kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: QueueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the consumer thread name.
    #[must_use]
    pub fn with_consumer_thread_name(mut self, name: impl Into<String>) -> Self {
        self.consumer_thread_name = name.into();
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), QueueError> {
        if self.kind == QueueKind::BoundedFifo && self.capacity == 0 {
            return Err(QueueError::InvalidConfig(
                "capacity must be greater than 0".into(),
            ));
        }
        if self.consumer_thread_name.trim().is_empty() {
            return Err(QueueError::InvalidConfig(
                "consumer_thread_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, QueueError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| QueueError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the process environment, after loading a
    /// `.env` file if one is present. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, QueueError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QueueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(kind) = lookup(ENV_KIND) {
            cfg.kind = kind.parse()?;
        }
        if let Some(capacity) = lookup(ENV_CAPACITY) {
            cfg.capacity = capacity.trim().parse().map_err(|e| {
                QueueError::InvalidConfig(format!("{ENV_CAPACITY}=`{capacity}`: {e}"))
            })?;
        }
        if let Some(name) = lookup(ENV_CONSUMER_THREAD) {
            cfg.consumer_thread_name = name;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
