//! User profile persistence queue (write-behind for signup)

use super::WORKER_CONCURRENCY;
use job_queue::{Broker, JobHandler, JobId, JobQueue, QueueError, QueueWorker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const JOB_ADD_USER: &str = "addUserToDB";

/// Profile row to persist, produced at signup time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserJob {
    /// Shared with the auth record minted at the same signup
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_color: String,
}

#[derive(Clone)]
pub struct UserQueue {
    queue: Arc<JobQueue>,
}

impl UserQueue {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self {
            queue: Arc::new(JobQueue::new("user", broker)),
        }
    }

    pub async fn register(&self, handler: Arc<dyn JobHandler>) {
        self.queue
            .process_job(JOB_ADD_USER, WORKER_CONCURRENCY, handler)
            .await;
    }

    pub async fn add_user_job(&self, payload: &UserJob) -> Result<JobId, QueueError> {
        self.queue.add_job(JOB_ADD_USER, payload).await
    }

    pub fn start(&self) -> QueueWorker {
        self.queue.clone().start()
    }
}
