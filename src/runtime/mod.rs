//! Runtime adapters: the dedicated consumer thread and the tokio bridge.

pub mod consumer;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_bridge;

pub use consumer::{spawn_consumer, ConsumerHandle};
#[cfg(feature = "tokio-runtime")]
pub use tokio_bridge::{shutdown_async, take_async, take_timeout_async};
