//! Redis Streams broker
//!
//! Each queue maps to the stream `queue:{name}`; workers consume through a
//! consumer group so deliveries survive process restarts until acked.

use super::{Broker, Delivery, JobId};
use crate::error::QueueError;
use async_trait::async_trait;
use redis::streams::{
    StreamClaimReply, StreamId, StreamPendingCountReply, StreamReadOptions, StreamReadReply,
};
use redis::{AsyncCommands, Client};
use std::time::Duration;

/// Approximate upper bound kept per stream so queues cannot grow unbounded.
const STREAM_MAXLEN: usize = 10_000;

pub struct RedisBroker {
    client: Client,
}

fn stream_key(queue: &str) -> String {
    format!("queue:{}", queue)
}

fn decode_entry(entry: StreamId) -> Result<Delivery, QueueError> {
    let job: String = entry
        .map
        .get("job")
        .and_then(|v| redis::from_redis_value(v).ok())
        .ok_or_else(|| QueueError::Broker("stream entry missing job field".into()))?;
    let raw: String = entry
        .map
        .get("payload")
        .and_then(|v| redis::from_redis_value(v).ok())
        .unwrap_or_else(|| "null".to_string());
    let payload = serde_json::from_str(&raw)?;

    Ok(Delivery {
        id: entry.id,
        job,
        payload,
    })
}

impl RedisBroker {
    pub fn new(redis_url: &str) -> Result<Self, QueueError> {
        let client = Client::open(redis_url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Broker for RedisBroker {
    async fn ensure_group(&self, queue: &str, group: &str) -> Result<(), QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        // BUSYGROUP means the group already exists; treat as success.
        let created: Result<(), redis::RedisError> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(stream_key(queue))
            .arg(group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        match created {
            Ok(()) => Ok(()),
            Err(e) if e.to_string().contains("BUSYGROUP") => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn enqueue(
        &self,
        queue: &str,
        job: &str,
        payload: &serde_json::Value,
    ) -> Result<JobId, QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = stream_key(queue);
        let body = serde_json::to_string(payload)?;

        let entry_id: String = conn
            .xadd(&key, "*", &[("job", job), ("payload", body.as_str())])
            .await?;

        // Approximate trim keeps the stream bounded without blocking writers.
        let _: Result<(), redis::RedisError> = redis::cmd("XTRIM")
            .arg(&key)
            .arg("MAXLEN")
            .arg("~")
            .arg(STREAM_MAXLEN)
            .query_async(&mut conn)
            .await;

        Ok(entry_id)
    }

    async fn read_batch(
        &self,
        queue: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block: Duration,
    ) -> Result<Vec<Delivery>, QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = stream_key(queue);

        let opts = StreamReadOptions::default()
            .group(group, consumer)
            .count(count)
            .block(block.as_millis() as usize);

        let reply: StreamReadReply = conn.xread_options(&[&key], &[">"], &opts).await?;

        let mut deliveries = Vec::new();
        for stream in reply.keys {
            for entry in stream.ids {
                deliveries.push(decode_entry(entry)?);
            }
        }

        Ok(deliveries)
    }

    async fn claim_stale(
        &self,
        queue: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> Result<Vec<Delivery>, QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = stream_key(queue);

        // The PEL holds every delivery handed to any consumer of the group,
        // including consumers from dead processes. XCLAIM only transfers
        // entries that have been idle for at least `min_idle`.
        let pending: StreamPendingCountReply =
            conn.xpending_count(&key, group, "-", "+", count).await?;
        if pending.ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = pending.ids.into_iter().map(|p| p.id).collect();
        let claimed: StreamClaimReply = conn
            .xclaim(&key, group, consumer, min_idle.as_millis() as usize, &ids)
            .await?;

        let mut deliveries = Vec::new();
        for entry in claimed.ids {
            deliveries.push(decode_entry(entry)?);
        }

        Ok(deliveries)
    }

    async fn ack(&self, queue: &str, group: &str, id: &JobId) -> Result<(), QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.xack(stream_key(queue), group, &[id]).await?;
        Ok(())
    }
}
