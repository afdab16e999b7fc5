//! Job handlers bound to the domain queues
//!
//! Workers are plain structs holding their dependencies; registration wires
//! them to job names and `start_workers` spawns one worker loop per queue.

pub mod auth_worker;
pub mod chat_worker;
pub mod comment_worker;
pub mod email_worker;
pub mod notification_worker;
pub mod user_worker;

pub use auth_worker::AuthWorker;
pub use chat_worker::ChatWorker;
pub use comment_worker::CommentWorker;
pub use email_worker::EmailWorker;
pub use notification_worker::NotificationWorker;
pub use user_worker::UserWorker;

use crate::app_state::AppState;
use job_queue::{handler_fn, QueueError, QueueWorker};
use std::sync::Arc;

/// A redelivered insert hits the row's own primary key; that is a completed
/// job, not a failure. Any other unique violation (two racing signups landing
/// on `auth_users_username_key`, say) is a real conflict and must surface.
pub(crate) fn is_redelivered_insert(err: &sqlx::Error, pk_constraint: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if db.code().as_deref() == Some("23505") && db.constraint() == Some(pk_constraint)
    )
}

pub(crate) fn db_error(err: sqlx::Error) -> QueueError {
    QueueError::Handler(err.to_string())
}

/// Bind every worker to its queue and spawn the worker loops.
///
/// The returned handles stop their loops when dropped; the caller keeps them
/// alive for the life of the server.
pub async fn start_workers(state: &AppState) -> Vec<QueueWorker> {
    let email_worker = Arc::new(EmailWorker::new(state.email_service.clone()));
    state.email_queue.register(email_worker).await;

    let auth_worker = Arc::new(AuthWorker::new(state.pool.clone()));
    state.auth_queue.register(auth_worker).await;

    let user_worker = Arc::new(UserWorker::new(state.pool.clone()));
    state.user_queue.register(user_worker).await;

    let comment_worker = Arc::new(CommentWorker::new(
        state.pool.clone(),
        state.redis.clone(),
        state.socket_registry.clone(),
        state.email_queue.clone(),
    ));
    state.comment_queue.register(comment_worker).await;

    let chat_worker = Arc::new(ChatWorker::new(state.pool.clone()));
    {
        let w = chat_worker.clone();
        let add_message = handler_fn(move |payload| {
            let w = w.clone();
            async move { w.add_message(payload).await }
        });
        let w = chat_worker.clone();
        let mark_deleted = handler_fn(move |payload| {
            let w = w.clone();
            async move { w.mark_deleted(payload).await }
        });
        let w = chat_worker.clone();
        let mark_read = handler_fn(move |payload| {
            let w = w.clone();
            async move { w.mark_read(payload).await }
        });
        let w = chat_worker.clone();
        let reaction = handler_fn(move |payload| {
            let w = w.clone();
            async move { w.set_reaction(payload).await }
        });
        state
            .chat_queue
            .register(add_message, mark_deleted, mark_read, reaction)
            .await;
    }

    let notification_worker = Arc::new(NotificationWorker::new(state.pool.clone()));
    {
        let w = notification_worker.clone();
        let update = handler_fn(move |payload| {
            let w = w.clone();
            async move { w.mark_as_read(payload).await }
        });
        let w = notification_worker.clone();
        let delete = handler_fn(move |payload| {
            let w = w.clone();
            async move { w.delete(payload).await }
        });
        state.notification_queue.register(update, delete).await;
    }

    vec![
        state.email_queue.start(),
        state.auth_queue.start(),
        state.user_queue.start(),
        state.comment_queue.start(),
        state.chat_queue.start(),
        state.notification_queue.start(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;

    #[derive(Debug)]
    struct DuplicateKey {
        constraint: &'static str,
    }

    impl std::fmt::Display for DuplicateKey {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "duplicate key value violates unique constraint \"{}\"",
                self.constraint
            )
        }
    }

    impl std::error::Error for DuplicateKey {}

    impl DatabaseError for DuplicateKey {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some("23505".into())
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    fn unique_violation(constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(DuplicateKey { constraint }))
    }

    #[test]
    fn pk_conflict_counts_as_redelivered_insert() {
        let err = unique_violation("auth_users_pkey");
        assert!(is_redelivered_insert(&err, "auth_users_pkey"));
    }

    #[test]
    fn secondary_unique_conflict_is_a_real_error() {
        // Two racing signups with the same username mint distinct ids, so
        // the collision lands on the username key and must not be swallowed.
        let err = unique_violation("auth_users_username_key");
        assert!(!is_redelivered_insert(&err, "auth_users_pkey"));
    }

    #[test]
    fn non_database_errors_never_match() {
        assert!(!is_redelivered_insert(&sqlx::Error::RowNotFound, "users_pkey"));
    }
}
