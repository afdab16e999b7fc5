//! Comment persistence and fan-out queue

use super::WORKER_CONCURRENCY;
use job_queue::{Broker, JobHandler, JobId, JobQueue, QueueError, QueueWorker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const JOB_ADD_COMMENT: &str = "addCommentToDB";

/// One comment to persist, plus everything the fan-out path needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentJob {
    /// Comment id minted by the handler, so a redelivered job re-inserts
    /// the same row instead of creating a duplicate.
    pub comment_id: Uuid,
    pub post_id: Uuid,
    /// Commenter profile id
    pub user_from: Uuid,
    /// Post owner profile id
    pub user_to: Uuid,
    pub username: String,
    pub avatar_color: String,
    pub comment: String,
}

#[derive(Clone)]
pub struct CommentQueue {
    queue: Arc<JobQueue>,
}

impl CommentQueue {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self {
            queue: Arc::new(JobQueue::new("comment", broker)),
        }
    }

    pub async fn register(&self, handler: Arc<dyn JobHandler>) {
        self.queue
            .process_job(JOB_ADD_COMMENT, WORKER_CONCURRENCY, handler)
            .await;
    }

    pub async fn add_comment_job(&self, payload: &CommentJob) -> Result<JobId, QueueError> {
        self.queue.add_job(JOB_ADD_COMMENT, payload).await
    }

    pub fn start(&self) -> QueueWorker {
        self.queue.clone().start()
    }
}
