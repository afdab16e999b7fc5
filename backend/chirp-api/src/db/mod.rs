pub mod auth_repo;
pub mod chat_repo;
pub mod comment_repo;
pub mod notification_repo;
pub mod post_repo;
pub mod user_repo;
