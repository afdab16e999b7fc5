//! Chat message mutations deferred through the chat queue

use super::{db_error, is_redelivered_insert};
use crate::db::chat_repo;
use crate::queues::{AddChatMessageJob, MarkDeletedJob, MarkReadJob, ReactionJob};
use job_queue::QueueError;
use sqlx::PgPool;

pub struct ChatWorker {
    pool: PgPool,
}

impl ChatWorker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn add_message(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: AddChatMessageJob = serde_json::from_value(payload)?;

        match chat_repo::insert_message(
            &self.pool,
            job.message_id,
            job.conversation_id,
            job.sender_id,
            job.receiver_id,
            &job.body,
        )
        .await
        {
            Ok(_) => {
                tracing::info!(message_id = %job.message_id, "chat message persisted");
                Ok(())
            }
            Err(e) if is_redelivered_insert(&e, "chat_messages_pkey") => {
                tracing::debug!(message_id = %job.message_id, "chat message already persisted");
                Ok(())
            }
            Err(e) => Err(db_error(e)),
        }
    }

    pub async fn mark_deleted(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: MarkDeletedJob = serde_json::from_value(payload)?;
        chat_repo::mark_message_deleted(&self.pool, job.message_id)
            .await
            .map_err(db_error)?;
        tracing::info!(message_id = %job.message_id, "chat message marked deleted");
        Ok(())
    }

    pub async fn mark_read(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: MarkReadJob = serde_json::from_value(payload)?;
        let updated = chat_repo::mark_conversation_read(
            &self.pool,
            job.conversation_id,
            job.sender_id,
            job.receiver_id,
        )
        .await
        .map_err(db_error)?;
        tracing::info!(conversation_id = %job.conversation_id, updated, "conversation marked read");
        Ok(())
    }

    pub async fn set_reaction(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: ReactionJob = serde_json::from_value(payload)?;
        chat_repo::set_message_reaction(&self.pool, job.message_id, &job.reaction)
            .await
            .map_err(db_error)?;
        tracing::info!(message_id = %job.message_id, reaction = %job.reaction, "message reaction updated");
        Ok(())
    }
}
