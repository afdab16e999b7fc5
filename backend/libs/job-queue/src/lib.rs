//! Redis Streams-backed background job queue
//!
//! A queue binds a name to a durable broker stream. Handlers are registered
//! per job name with a concurrency cap; enqueuing resolves once the broker
//! has durably accepted the entry, never on processing completion.

pub mod broker;
mod error;
mod queue;
mod registry;

pub use broker::{Broker, Delivery, JobId, MemoryBroker, RedisBroker};
pub use error::QueueError;
pub use queue::{JobQueue, QueueWorker};
pub use registry::{handler_fn, JobHandler, JobRegistry};
