pub mod auth;
pub mod chat;
pub mod comment;
pub mod notification;
pub mod post;
pub mod user;

pub use auth::AuthRecord;
pub use chat::ChatMessage;
pub use comment::Comment;
pub use notification::Notification;
pub use post::Post;
pub use user::User;
