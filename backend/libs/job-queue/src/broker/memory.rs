//! In-process broker for local development and tests
//!
//! Mirrors the Redis Streams contract (accept-then-deliver, ack to settle)
//! without requiring a running Redis. Not durable across restarts.

use super::{Broker, Delivery, JobId};
use crate::error::QueueError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Notify};

struct PendingEntry {
    delivery: Delivery,
    delivered_at: Instant,
}

#[derive(Default)]
struct QueueState {
    ready: VecDeque<Delivery>,
    pending: HashMap<JobId, PendingEntry>,
    acked: u64,
}

#[derive(Default)]
pub struct MemoryBroker {
    queues: Mutex<HashMap<String, QueueState>>,
    notify: Notify,
    seq: AtomicU64,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries handed out but not yet acked.
    pub async fn pending_count(&self, queue: &str) -> usize {
        let queues = self.queues.lock().await;
        queues.get(queue).map(|q| q.pending.len()).unwrap_or(0)
    }

    /// Deliveries settled via ack.
    pub async fn acked_count(&self, queue: &str) -> u64 {
        let queues = self.queues.lock().await;
        queues.get(queue).map(|q| q.acked).unwrap_or(0)
    }

    async fn take_ready(&self, queue: &str, count: usize) -> Vec<Delivery> {
        let mut queues = self.queues.lock().await;
        let state = queues.entry(queue.to_string()).or_default();

        let mut batch = Vec::new();
        while batch.len() < count {
            match state.ready.pop_front() {
                Some(delivery) => {
                    state.pending.insert(
                        delivery.id.clone(),
                        PendingEntry {
                            delivery: delivery.clone(),
                            delivered_at: Instant::now(),
                        },
                    );
                    batch.push(delivery);
                }
                None => break,
            }
        }
        batch
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    async fn ensure_group(&self, queue: &str, _group: &str) -> Result<(), QueueError> {
        let mut queues = self.queues.lock().await;
        queues.entry(queue.to_string()).or_default();
        Ok(())
    }

    async fn enqueue(
        &self,
        queue: &str,
        job: &str,
        payload: &serde_json::Value,
    ) -> Result<JobId, QueueError> {
        let id = format!("{}-0", self.seq.fetch_add(1, Ordering::SeqCst));
        let delivery = Delivery {
            id: id.clone(),
            job: job.to_string(),
            payload: payload.clone(),
        };

        {
            let mut queues = self.queues.lock().await;
            queues
                .entry(queue.to_string())
                .or_default()
                .ready
                .push_back(delivery);
        }
        self.notify.notify_waiters();

        Ok(id)
    }

    async fn read_batch(
        &self,
        queue: &str,
        _group: &str,
        _consumer: &str,
        count: usize,
        block: Duration,
    ) -> Result<Vec<Delivery>, QueueError> {
        let batch = self.take_ready(queue, count).await;
        if !batch.is_empty() {
            return Ok(batch);
        }

        // Wait for a producer, then re-check once. Empty on timeout is fine;
        // the worker loop polls again.
        let _ = tokio::time::timeout(block, self.notify.notified()).await;
        Ok(self.take_ready(queue, count).await)
    }

    async fn claim_stale(
        &self,
        queue: &str,
        _group: &str,
        _consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> Result<Vec<Delivery>, QueueError> {
        let mut queues = self.queues.lock().await;
        let state = match queues.get_mut(queue) {
            Some(state) => state,
            None => return Ok(Vec::new()),
        };

        let now = Instant::now();
        let mut claimed = Vec::new();
        for entry in state.pending.values_mut() {
            if claimed.len() >= count {
                break;
            }
            if now.duration_since(entry.delivered_at) >= min_idle {
                entry.delivered_at = now;
                claimed.push(entry.delivery.clone());
            }
        }

        Ok(claimed)
    }

    async fn ack(&self, queue: &str, _group: &str, id: &JobId) -> Result<(), QueueError> {
        let mut queues = self.queues.lock().await;
        if let Some(state) = queues.get_mut(queue) {
            if state.pending.remove(id).is_some() {
                state.acked += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn enqueue_then_read_then_ack() {
        let broker = MemoryBroker::new();
        let id = broker
            .enqueue("email", "commentsEmail", &serde_json::json!({"to": "a@b.c"}))
            .await
            .unwrap();

        let batch = broker
            .read_batch("email", "g", "c", 10, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].job, "commentsEmail");
        assert_eq!(broker.pending_count("email").await, 1);

        broker.ack("email", "g", &id).await.unwrap();
        assert_eq!(broker.pending_count("email").await, 0);
        assert_eq!(broker.acked_count("email").await, 1);
    }

    #[tokio::test]
    async fn unacked_delivery_becomes_claimable_once_idle() {
        let broker = MemoryBroker::new();
        broker
            .enqueue("email", "commentsEmail", &serde_json::json!({}))
            .await
            .unwrap();
        let batch = broker
            .read_batch("email", "g", "c1", 10, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);

        // Still within the idle window, nothing to hand over.
        let claimed = broker
            .claim_stale("email", "g", "c2", Duration::from_secs(30), 10)
            .await
            .unwrap();
        assert!(claimed.is_empty());

        let claimed = broker
            .claim_stale("email", "g", "c2", Duration::ZERO, 10)
            .await
            .unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].id, batch[0].id);
        // Claiming re-delivers; it does not settle the entry.
        assert_eq!(broker.pending_count("email").await, 1);
    }

    #[tokio::test]
    async fn read_empty_queue_times_out() {
        let broker = MemoryBroker::new();
        let batch = broker
            .read_batch("email", "g", "c", 10, Duration::from_millis(20))
            .await
            .unwrap();
        assert!(batch.is_empty());
    }
}
