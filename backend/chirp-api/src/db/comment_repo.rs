//! Comment repository

use crate::models::comment::CommentNames;
use crate::models::Comment;
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "id, post_id, user_id, username, avatar_color, comment, created_at";

pub async fn create_comment(
    pool: &PgPool,
    id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    username: &str,
    avatar_color: &str,
    comment: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        INSERT INTO comments (id, post_id, user_id, username, avatar_color, comment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COMMENT_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(post_id)
    .bind(user_id)
    .bind(username)
    .bind(avatar_color)
    .bind(comment)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Comments for one post, newest first
pub async fn get_comments_by_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        SELECT {COMMENT_COLUMNS} FROM comments
        WHERE post_id = $1
        ORDER BY created_at DESC
        "#,
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await
}

/// Distinct commenter usernames plus the total comment count, one query
pub async fn get_comment_names(pool: &PgPool, post_id: Uuid) -> Result<CommentNames, sqlx::Error> {
    sqlx::query_as::<_, CommentNames>(
        r#"
        SELECT
            COALESCE(ARRAY_AGG(DISTINCT username), '{}') AS names,
            COUNT(*) AS count
        FROM comments
        WHERE post_id = $1
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await
}
