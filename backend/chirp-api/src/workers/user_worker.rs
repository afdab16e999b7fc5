//! Persists user profile rows enqueued at signup

use super::{db_error, is_redelivered_insert};
use crate::db::user_repo;
use crate::queues::UserJob;
use async_trait::async_trait;
use job_queue::{JobHandler, QueueError};
use sqlx::PgPool;

pub struct UserWorker {
    pool: PgPool,
}

impl UserWorker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobHandler for UserWorker {
    async fn handle(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: UserJob = serde_json::from_value(payload)?;

        match user_repo::create_user(
            &self.pool,
            job.id,
            &job.username,
            &job.email,
            &job.avatar_color,
        )
        .await
        {
            Ok(_) => {
                tracing::info!(user_id = %job.id, username = %job.username, "user profile persisted");
                Ok(())
            }
            Err(e) if is_redelivered_insert(&e, "users_pkey") => {
                tracing::debug!(user_id = %job.id, "user profile already persisted, acking redelivery");
                Ok(())
            }
            Err(e) => Err(db_error(e)),
        }
    }
}
