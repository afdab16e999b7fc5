use crate::error::QueueError;
use async_trait::async_trait;
use std::time::Duration;

mod memory;
mod redis_broker;

pub use memory::MemoryBroker;
pub use redis_broker::RedisBroker;

/// Broker-assigned identifier of a durably accepted job.
pub type JobId = String;

/// One unit of work handed to a consumer.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub id: JobId,
    pub job: String,
    pub payload: serde_json::Value,
}

/// Durable job transport.
///
/// `enqueue` must not return before the entry is accepted by the broker;
/// unacked deliveries stay pending and follow the broker's own redelivery
/// semantics (no retry policy is layered on top).
#[async_trait]
pub trait Broker: Send + Sync {
    /// Create the consumer group for a queue if it does not exist yet.
    async fn ensure_group(&self, queue: &str, group: &str) -> Result<(), QueueError>;

    /// Durably append one job to the queue and return its broker id.
    async fn enqueue(
        &self,
        queue: &str,
        job: &str,
        payload: &serde_json::Value,
    ) -> Result<JobId, QueueError>;

    /// Read up to `count` new deliveries for a consumer, blocking up to `block`.
    async fn read_batch(
        &self,
        queue: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block: Duration,
    ) -> Result<Vec<Delivery>, QueueError>;

    /// Claim deliveries that have sat unacked for at least `min_idle`,
    /// transferring them to `consumer` for another attempt. This is how a
    /// failed or orphaned delivery gets back into circulation.
    async fn claim_stale(
        &self,
        queue: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> Result<Vec<Delivery>, QueueError>;

    /// Mark a delivery as processed.
    async fn ack(&self, queue: &str, group: &str, id: &JobId) -> Result<(), QueueError>;
}
