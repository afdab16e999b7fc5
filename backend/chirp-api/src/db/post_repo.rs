//! Post repository

use crate::models::Post;
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = "id, user_id, username, content, comments_count, created_at";

pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    username: &str,
    content: &str,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!(
        r#"
        INSERT INTO posts (user_id, username, content)
        VALUES ($1, $2, $3)
        RETURNING {POST_COLUMNS}
        "#,
    ))
    .bind(user_id)
    .bind(username)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Atomic counter bump, returning the updated row
pub async fn increment_comments_count(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!(
        r#"
        UPDATE posts
        SET comments_count = comments_count + 1
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#,
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await
}
