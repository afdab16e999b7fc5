//! Auth persistence queue (write-behind for signup)

use super::WORKER_CONCURRENCY;
use job_queue::{Broker, JobHandler, JobId, JobQueue, QueueError, QueueWorker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const JOB_ADD_AUTH_USER: &str = "addAuthUserToDB";

/// Auth record to persist, produced at signup time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthJob {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_color: String,
}

#[derive(Clone)]
pub struct AuthQueue {
    queue: Arc<JobQueue>,
}

impl AuthQueue {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self {
            queue: Arc::new(JobQueue::new("auth", broker)),
        }
    }

    pub async fn register(&self, handler: Arc<dyn JobHandler>) {
        self.queue
            .process_job(JOB_ADD_AUTH_USER, WORKER_CONCURRENCY, handler)
            .await;
    }

    pub async fn add_auth_user_job(&self, payload: &AuthJob) -> Result<JobId, QueueError> {
        self.queue.add_job(JOB_ADD_AUTH_USER, payload).await
    }

    pub fn start(&self) -> QueueWorker {
        self.queue.clone().start()
    }
}
