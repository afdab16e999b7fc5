//! Auth account repository
//!
//! Reset tokens are stored hashed; lookups hash the presented token before
//! matching, so a database leak never exposes a usable token.

use crate::models::AuthRecord;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const AUTH_COLUMNS: &str = "id, username, email, password_hash, avatar_color, \
     password_reset_token, password_reset_expires, created_at";

/// Create an auth account row
pub async fn create_auth_user(
    pool: &PgPool,
    id: Uuid,
    username: &str,
    email: &str,
    password_hash: &str,
    avatar_color: &str,
) -> Result<AuthRecord, sqlx::Error> {
    sqlx::query_as::<_, AuthRecord>(&format!(
        r#"
        INSERT INTO auth_users (id, username, email, password_hash, avatar_color)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {AUTH_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(avatar_color)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, auth_id: Uuid) -> Result<Option<AuthRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuthRecord>(&format!(
        "SELECT {AUTH_COLUMNS} FROM auth_users WHERE id = $1",
    ))
    .bind(auth_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<AuthRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuthRecord>(&format!(
        "SELECT {AUTH_COLUMNS} FROM auth_users WHERE LOWER(username) = LOWER($1)",
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AuthRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuthRecord>(&format!(
        "SELECT {AUTH_COLUMNS} FROM auth_users WHERE LOWER(email) = LOWER($1)",
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Signup duplicate check: username or email already taken
pub async fn find_by_username_or_email(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<Option<AuthRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuthRecord>(&format!(
        r#"
        SELECT {AUTH_COLUMNS} FROM auth_users
        WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($2)
        "#,
    ))
    .bind(username)
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Store a hashed reset token and its expiry in a single UPDATE
pub async fn set_reset_token(
    pool: &PgPool,
    auth_id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE auth_users
        SET password_reset_token = $2, password_reset_expires = $3
        WHERE id = $1
        "#,
    )
    .bind(auth_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Find the account holding an unexpired reset token
pub async fn find_by_valid_reset_token(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<AuthRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuthRecord>(&format!(
        r#"
        SELECT {AUTH_COLUMNS} FROM auth_users
        WHERE password_reset_token = $1 AND password_reset_expires > NOW()
        "#,
    ))
    .bind(token_hash)
    .fetch_optional(pool)
    .await
}

/// Consume a reset token: set the new hash and clear the token fields in a
/// single UPDATE. Returns false when the token was missing or expired.
pub async fn reset_password_by_token(
    pool: &PgPool,
    token_hash: &str,
    new_password_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE auth_users
        SET password_hash = $2,
            password_reset_token = NULL,
            password_reset_expires = NULL
        WHERE password_reset_token = $1 AND password_reset_expires > NOW()
        "#,
    )
    .bind(token_hash)
    .bind(new_password_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_password(
    pool: &PgPool,
    auth_id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE auth_users SET password_hash = $2 WHERE id = $1")
        .bind(auth_id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}
