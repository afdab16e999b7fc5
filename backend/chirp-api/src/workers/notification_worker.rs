//! Notification mutations deferred through the notification queue

use super::db_error;
use crate::db::notification_repo;
use crate::queues::NotificationJob;
use job_queue::QueueError;
use sqlx::PgPool;

pub struct NotificationWorker {
    pool: PgPool,
}

impl NotificationWorker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn mark_as_read(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: NotificationJob = serde_json::from_value(payload)?;
        notification_repo::mark_as_read(&self.pool, job.notification_id)
            .await
            .map_err(db_error)?;
        tracing::info!(notification_id = %job.notification_id, "notification marked as read");
        Ok(())
    }

    pub async fn delete(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: NotificationJob = serde_json::from_value(payload)?;
        notification_repo::delete_notification(&self.pool, job.notification_id)
            .await
            .map_err(db_error)?;
        tracing::info!(notification_id = %job.notification_id, "notification deleted");
        Ok(())
    }
}
