//! Email dispatch queue

use super::WORKER_CONCURRENCY;
use job_queue::{Broker, JobHandler, JobId, JobQueue, QueueError, QueueWorker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const JOB_FORGOT_PASSWORD_EMAIL: &str = "forgotPasswordEmail";
pub const JOB_CHANGE_PASSWORD_EMAIL: &str = "changePassword";
pub const JOB_COMMENTS_EMAIL: &str = "commentsEmail";

/// Pre-rendered email carried through the broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    pub receiver_email: String,
    pub subject: String,
    pub template: String,
}

#[derive(Clone)]
pub struct EmailQueue {
    queue: Arc<JobQueue>,
}

impl EmailQueue {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self {
            queue: Arc::new(JobQueue::new("email", broker)),
        }
    }

    /// Bind the email worker to every email job name
    pub async fn register(&self, handler: Arc<dyn JobHandler>) {
        for job in [
            JOB_FORGOT_PASSWORD_EMAIL,
            JOB_CHANGE_PASSWORD_EMAIL,
            JOB_COMMENTS_EMAIL,
        ] {
            self.queue
                .process_job(job, WORKER_CONCURRENCY, handler.clone())
                .await;
        }
    }

    pub async fn add_email_job(&self, job: &str, payload: &EmailJob) -> Result<JobId, QueueError> {
        self.queue.add_job(job, payload).await
    }

    pub fn start(&self) -> QueueWorker {
        self.queue.clone().start()
    }
}
