//! Persists auth records enqueued at signup

use super::{db_error, is_redelivered_insert};
use crate::db::auth_repo;
use crate::queues::AuthJob;
use async_trait::async_trait;
use job_queue::{JobHandler, QueueError};
use sqlx::PgPool;

pub struct AuthWorker {
    pool: PgPool,
}

impl AuthWorker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobHandler for AuthWorker {
    async fn handle(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: AuthJob = serde_json::from_value(payload)?;

        match auth_repo::create_auth_user(
            &self.pool,
            job.id,
            &job.username,
            &job.email,
            &job.password_hash,
            &job.avatar_color,
        )
        .await
        {
            Ok(_) => {
                tracing::info!(auth_id = %job.id, username = %job.username, "auth record persisted");
                Ok(())
            }
            Err(e) if is_redelivered_insert(&e, "auth_users_pkey") => {
                tracing::debug!(auth_id = %job.id, "auth record already persisted, acking redelivery");
                Ok(())
            }
            Err(e) => Err(db_error(e)),
        }
    }
}
