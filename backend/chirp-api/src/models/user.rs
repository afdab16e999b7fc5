//! User profile model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    /// Shared with the auth_users row created at the same signup
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_color: String,
    pub notify_messages: bool,
    pub notify_comments: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 4, max = 8, message = "Invalid password"))]
    pub current_password: String,
    #[validate(length(min = 4, max = 8, message = "Invalid password"))]
    pub new_password: String,
    #[validate(length(min = 4, max = 8, message = "Invalid password"))]
    pub confirm_password: String,
}
