//! User profile repository

use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, avatar_color, \
     notify_messages, notify_comments, created_at";

pub async fn create_user(
    pool: &PgPool,
    id: Uuid,
    username: &str,
    email: &str,
    avatar_color: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, email, avatar_color)
        VALUES ($1, $2, $3, $4)
        RETURNING {USER_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(avatar_color)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
