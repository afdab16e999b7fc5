//! Chat message mutation queue

use super::WORKER_CONCURRENCY;
use job_queue::{Broker, JobHandler, JobId, JobQueue, QueueError, QueueWorker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const JOB_ADD_CHAT_MESSAGE: &str = "addChatMessageToDB";
pub const JOB_MARK_MESSAGE_DELETED: &str = "markMessageAsDeletedInDB";
pub const JOB_MARK_MESSAGES_READ: &str = "markMessagesAsReadInDB";
pub const JOB_UPDATE_MESSAGE_REACTION: &str = "updateMessageReaction";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddChatMessageJob {
    /// Message id minted by the handler so the client sees it immediately
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkDeletedJob {
    pub message_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadJob {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionJob {
    pub message_id: Uuid,
    pub reaction: String,
}

#[derive(Clone)]
pub struct ChatQueue {
    queue: Arc<JobQueue>,
}

impl ChatQueue {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self {
            queue: Arc::new(JobQueue::new("chat", broker)),
        }
    }

    /// Bind one handler per chat job name
    pub async fn register(
        &self,
        add_message: Arc<dyn JobHandler>,
        mark_deleted: Arc<dyn JobHandler>,
        mark_read: Arc<dyn JobHandler>,
        reaction: Arc<dyn JobHandler>,
    ) {
        self.queue
            .process_job(JOB_ADD_CHAT_MESSAGE, WORKER_CONCURRENCY, add_message)
            .await;
        self.queue
            .process_job(JOB_MARK_MESSAGE_DELETED, WORKER_CONCURRENCY, mark_deleted)
            .await;
        self.queue
            .process_job(JOB_MARK_MESSAGES_READ, WORKER_CONCURRENCY, mark_read)
            .await;
        self.queue
            .process_job(JOB_UPDATE_MESSAGE_REACTION, WORKER_CONCURRENCY, reaction)
            .await;
    }

    pub async fn add_message_job(&self, payload: &AddChatMessageJob) -> Result<JobId, QueueError> {
        self.queue.add_job(JOB_ADD_CHAT_MESSAGE, payload).await
    }

    pub async fn mark_deleted_job(&self, payload: &MarkDeletedJob) -> Result<JobId, QueueError> {
        self.queue.add_job(JOB_MARK_MESSAGE_DELETED, payload).await
    }

    pub async fn mark_read_job(&self, payload: &MarkReadJob) -> Result<JobId, QueueError> {
        self.queue.add_job(JOB_MARK_MESSAGES_READ, payload).await
    }

    pub async fn reaction_job(&self, payload: &ReactionJob) -> Result<JobId, QueueError> {
        self.queue
            .add_job(JOB_UPDATE_MESSAGE_REACTION, payload)
            .await
    }

    pub fn start(&self) -> QueueWorker {
        self.queue.clone().start()
    }
}
