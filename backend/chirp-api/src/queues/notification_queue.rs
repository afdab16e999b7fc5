//! Notification mutation queue

use super::WORKER_CONCURRENCY;
use job_queue::{Broker, JobHandler, JobId, JobQueue, QueueError, QueueWorker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const JOB_UPDATE_NOTIFICATION: &str = "updateNotification";
pub const JOB_DELETE_NOTIFICATION: &str = "deleteNotification";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationJob {
    pub notification_id: Uuid,
}

#[derive(Clone)]
pub struct NotificationQueue {
    queue: Arc<JobQueue>,
}

impl NotificationQueue {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self {
            queue: Arc::new(JobQueue::new("notification", broker)),
        }
    }

    pub async fn register(
        &self,
        update: Arc<dyn JobHandler>,
        delete: Arc<dyn JobHandler>,
    ) {
        self.queue
            .process_job(JOB_UPDATE_NOTIFICATION, WORKER_CONCURRENCY, update)
            .await;
        self.queue
            .process_job(JOB_DELETE_NOTIFICATION, WORKER_CONCURRENCY, delete)
            .await;
    }

    pub async fn update_notification_job(
        &self,
        payload: &NotificationJob,
    ) -> Result<JobId, QueueError> {
        self.queue.add_job(JOB_UPDATE_NOTIFICATION, payload).await
    }

    pub async fn delete_notification_job(
        &self,
        payload: &NotificationJob,
    ) -> Result<JobId, QueueError> {
        self.queue.add_job(JOB_DELETE_NOTIFICATION, payload).await
    }

    pub fn start(&self) -> QueueWorker {
        self.queue.clone().start()
    }
}
