use crate::broker::{Broker, Delivery, JobId};
use crate::error::QueueError;
use crate::registry::{JobHandler, JobRegistry};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const READ_BATCH_SIZE: usize = 32;
const READ_BLOCK: Duration = Duration::from_secs(5);
const REDELIVER_IDLE: Duration = Duration::from_secs(30);

/// A named queue bound to a broker stream.
///
/// Handlers are registered per job name before the worker is started; the
/// worker loop reads batches from the consumer group, dispatches each
/// delivery under the job's concurrency cap, and acks on handler success.
/// A failed delivery stays pending until the periodic sweep claims it back
/// for another attempt.
pub struct JobQueue {
    name: String,
    group: String,
    consumer: String,
    broker: Arc<dyn Broker>,
    registry: JobRegistry,
    redeliver_idle: Duration,
}

impl JobQueue {
    pub fn new(name: &str, broker: Arc<dyn Broker>) -> Self {
        Self {
            name: name.to_string(),
            group: format!("{}-workers", name),
            consumer: format!("worker-{}", Uuid::new_v4()),
            broker,
            registry: JobRegistry::new(),
            redeliver_idle: REDELIVER_IDLE,
        }
    }

    /// Override how long a delivery may sit unacked before the sweep
    /// reclaims it for another attempt.
    pub fn with_redeliver_idle(mut self, idle: Duration) -> Self {
        self.redeliver_idle = idle;
        self
    }

    /// Register a handler for a named job with a concurrency cap.
    pub async fn process_job(&self, job: &str, concurrency: usize, handler: Arc<dyn JobHandler>) {
        self.registry.register(job, concurrency, handler).await;
        debug!(queue = %self.name, job, concurrency, "job handler registered");
    }

    /// Enqueue one unit of work.
    ///
    /// The returned future resolves when the broker has durably accepted the
    /// entry; it never waits for processing.
    pub async fn add_job<T: Serialize>(&self, job: &str, payload: &T) -> Result<JobId, QueueError> {
        let value = serde_json::to_value(payload)?;
        let id = self.broker.enqueue(&self.name, job, &value).await?;
        debug!(queue = %self.name, job, id = %id, "job enqueued");
        Ok(id)
    }

    /// Spawn the worker loop. Dropping the returned handle stops it.
    pub fn start(self: Arc<Self>) -> QueueWorker {
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let handle = tokio::spawn(async move {
            self.run(shutdown_rx).await;
        });

        QueueWorker {
            shutdown_tx,
            handle,
        }
    }

    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<()>) {
        while let Err(e) = self.broker.ensure_group(&self.name, &self.group).await {
            error!(queue = %self.name, error = %e, "failed to create consumer group, retrying");
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        info!(queue = %self.name, group = %self.group, "queue worker started");

        let mut sweep = tokio::time::interval(self.redeliver_idle.max(Duration::from_millis(50)));

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!(queue = %self.name, "queue worker shutting down");
                    break;
                }
                _ = sweep.tick() => {
                    self.clone().reclaim_stale().await;
                }
                batch = self.broker.read_batch(
                    &self.name,
                    &self.group,
                    &self.consumer,
                    READ_BATCH_SIZE,
                    READ_BLOCK,
                ) => match batch {
                    Ok(deliveries) => {
                        for delivery in deliveries {
                            self.clone().dispatch(delivery).await;
                        }
                    }
                    Err(e) => {
                        warn!(queue = %self.name, error = %e, "broker read failed");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                },
            }
        }
    }

    /// Claim deliveries left unacked past the idle window and run them again.
    /// Covers both handler failures and entries stranded by a dead consumer.
    async fn reclaim_stale(self: Arc<Self>) {
        match self
            .broker
            .claim_stale(
                &self.name,
                &self.group,
                &self.consumer,
                self.redeliver_idle,
                READ_BATCH_SIZE,
            )
            .await
        {
            Ok(deliveries) => {
                for delivery in deliveries {
                    debug!(queue = %self.name, id = %delivery.id, "redelivering stale entry");
                    self.clone().dispatch(delivery).await;
                }
            }
            Err(e) => {
                warn!(queue = %self.name, error = %e, "pending sweep failed");
            }
        }
    }

    async fn dispatch(self: Arc<Self>, delivery: Delivery) {
        let Some(registration) = self.registry.lookup(&delivery.job).await else {
            // No handler owns this name; settle it so it does not redeliver
            // forever, but leave a trace for the operator.
            warn!(
                queue = %self.name,
                job = %delivery.job,
                id = %delivery.id,
                "no handler registered for job, dropping"
            );
            if let Err(e) = self.broker.ack(&self.name, &self.group, &delivery.id).await {
                error!(queue = %self.name, error = %e, "failed to ack unhandled job");
            }
            return;
        };

        let queue = self.clone();
        tokio::spawn(async move {
            let _permit = match registration.permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return, // semaphore closed, worker is gone
            };

            match registration.handler.handle(delivery.payload).await {
                Ok(()) => {
                    if let Err(e) = queue
                        .broker
                        .ack(&queue.name, &queue.group, &delivery.id)
                        .await
                    {
                        error!(queue = %queue.name, id = %delivery.id, error = %e, "ack failed");
                    }
                }
                Err(e) => {
                    // Left unacked on purpose: redelivery is the broker's call.
                    error!(
                        queue = %queue.name,
                        job = %delivery.job,
                        id = %delivery.id,
                        error = %e,
                        "job handler failed"
                    );
                }
            }
        });
    }
}

/// Handle to a running worker loop; stops the loop when dropped.
pub struct QueueWorker {
    shutdown_tx: watch::Sender<()>,
    handle: JoinHandle<()>,
}

impl Drop for QueueWorker {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        self.handle.abort();
    }
}
