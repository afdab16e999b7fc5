//! Comment persistence and notification fan-out
//!
//! Order of effects: insert the comment, bump the parent counter, then fan
//! out. The notification (row + socket push + email job) happens only when
//! the post owner has comment notifications enabled and did not write the
//! comment themselves.

use super::{db_error, is_redelivered_insert};
use crate::cache::user_cache;
use crate::db::{comment_repo, notification_repo, post_repo};
use crate::models::notification::NewNotification;
use crate::queues::{CommentJob, EmailJob, EmailQueue, JOB_COMMENTS_EMAIL};
use crate::services::templates;
use crate::websocket::{SocketRegistry, EVENT_INSERT_NOTIFICATION};
use async_trait::async_trait;
use job_queue::{JobHandler, QueueError};
use redis_utils::SharedConnectionManager;
use sqlx::PgPool;
use uuid::Uuid;

/// Fan-out gate: notify only when the recipient opted in and is not the
/// commenter.
pub fn should_notify(notify_comments: bool, user_from: Uuid, user_to: Uuid) -> bool {
    notify_comments && user_from != user_to
}

pub struct CommentWorker {
    pool: PgPool,
    redis: SharedConnectionManager,
    socket_registry: SocketRegistry,
    email_queue: EmailQueue,
}

impl CommentWorker {
    pub fn new(
        pool: PgPool,
        redis: SharedConnectionManager,
        socket_registry: SocketRegistry,
        email_queue: EmailQueue,
    ) -> Self {
        Self {
            pool,
            redis,
            socket_registry,
            email_queue,
        }
    }
}

#[async_trait]
impl JobHandler for CommentWorker {
    async fn handle(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: CommentJob = serde_json::from_value(payload)?;

        let comment = match comment_repo::create_comment(
            &self.pool,
            job.comment_id,
            job.post_id,
            job.user_from,
            &job.username,
            &job.avatar_color,
            &job.comment,
        )
        .await
        {
            Ok(comment) => {
                post_repo::increment_comments_count(&self.pool, job.post_id)
                    .await
                    .map_err(db_error)?;
                comment
            }
            Err(e) if is_redelivered_insert(&e, "comments_pkey") => {
                // The row and the counter bump landed on an earlier attempt;
                // resume the fan-out without bumping again.
                tracing::debug!(comment_id = %job.comment_id, "comment already persisted");
                match comment_repo::find_by_id(&self.pool, job.comment_id)
                    .await
                    .map_err(db_error)?
                {
                    Some(comment) => comment,
                    // Post deletion cascades over comments; nothing to fan out.
                    None => return Ok(()),
                }
            }
            Err(e) => return Err(db_error(e)),
        };

        let recipient = user_cache::get_user_with_fallback(&self.redis, &self.pool, job.user_to)
            .await
            .map_err(db_error)?;

        let Some(recipient) = recipient else {
            tracing::warn!(user_to = %job.user_to, "comment recipient not found, skipping fan-out");
            return Ok(());
        };

        if !should_notify(recipient.notify_comments, job.user_from, job.user_to) {
            tracing::debug!(
                user_to = %job.user_to,
                user_from = %job.user_from,
                "comment notification suppressed"
            );
            return Ok(());
        }

        let inserted = notification_repo::insert_notification(
            &self.pool,
            &NewNotification {
                user_to: job.user_to,
                user_from: job.user_from,
                notification_type: "comment".to_string(),
                message: format!("{} commented on your post.", job.username),
                entity_id: job.post_id,
                created_item_id: comment.id,
            },
        )
        .await
        .map_err(db_error)?;

        // On redelivery the row already exists; re-read it so the push and
        // the email still go out. Email delivery is at-least-once.
        let notification = match inserted {
            Some(notification) => notification,
            None => notification_repo::find_by_created_item(&self.pool, comment.id)
                .await
                .map_err(db_error)?
                .ok_or_else(|| {
                    QueueError::Handler("notification row missing after conflict".into())
                })?,
        };

        self.socket_registry.emit(
            job.user_to,
            EVENT_INSERT_NOTIFICATION,
            serde_json::to_value(&notification)?,
        );

        self.email_queue
            .add_email_job(
                JOB_COMMENTS_EMAIL,
                &EmailJob {
                    receiver_email: recipient.email,
                    subject: "Comment notification".to_string(),
                    template: templates::comment_notification_template(
                        &job.username,
                        &job.comment,
                    ),
                },
            )
            .await?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %job.post_id,
            user_to = %job.user_to,
            "comment persisted with notification fan-out"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_when_enabled_and_distinct_users() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        assert!(should_notify(true, from, to));
    }

    #[test]
    fn suppresses_self_comments() {
        let user = Uuid::new_v4();
        assert!(!should_notify(true, user, user));
    }

    #[test]
    fn suppresses_when_preference_disabled() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        assert!(!should_notify(false, from, to));
    }
}
