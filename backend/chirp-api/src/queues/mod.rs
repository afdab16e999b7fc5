//! Domain queues
//!
//! Thin wrappers over [`job_queue::JobQueue`], one per stream, constructed
//! once at startup and carried in `AppState`. Each wrapper owns its job-name
//! constants and typed payloads; handlers are bound by the matching worker.

pub mod auth_queue;
pub mod chat_queue;
pub mod comment_queue;
pub mod email_queue;
pub mod notification_queue;
pub mod user_queue;

pub use auth_queue::{AuthJob, AuthQueue, JOB_ADD_AUTH_USER};
pub use chat_queue::{
    AddChatMessageJob, ChatQueue, MarkDeletedJob, MarkReadJob, ReactionJob, JOB_ADD_CHAT_MESSAGE,
    JOB_MARK_MESSAGES_READ, JOB_MARK_MESSAGE_DELETED, JOB_UPDATE_MESSAGE_REACTION,
};
pub use comment_queue::{CommentJob, CommentQueue, JOB_ADD_COMMENT};
pub use email_queue::{
    EmailJob, EmailQueue, JOB_CHANGE_PASSWORD_EMAIL, JOB_COMMENTS_EMAIL,
    JOB_FORGOT_PASSWORD_EMAIL,
};
pub use notification_queue::{
    NotificationJob, NotificationQueue, JOB_DELETE_NOTIFICATION, JOB_UPDATE_NOTIFICATION,
};
pub use user_queue::{UserJob, UserQueue, JOB_ADD_USER};

/// Default per-job concurrency cap
pub const WORKER_CONCURRENCY: usize = 5;
