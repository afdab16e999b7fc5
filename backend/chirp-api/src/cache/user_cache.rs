//! User profile cache over Redis
//!
//! Cache errors never fail a request: readers fall back to the database
//! with a warning.

use crate::db::user_repo;
use crate::models::User;
use chrono::{DateTime, Utc};
use redis_utils::{run_with_timeout, SharedConnectionManager};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const USER_CACHE_TTL: usize = 3600; // 1 hour

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_color: String,
    pub notify_messages: bool,
    pub notify_comments: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for CachedUser {
    fn from(user: User) -> Self {
        CachedUser {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_color: user.avatar_color,
            notify_messages: user.notify_messages,
            notify_comments: user.notify_comments,
            created_at: user.created_at,
        }
    }
}

impl From<CachedUser> for User {
    fn from(cached: CachedUser) -> Self {
        User {
            id: cached.id,
            username: cached.username,
            email: cached.email,
            avatar_color: cached.avatar_color,
            notify_messages: cached.notify_messages,
            notify_comments: cached.notify_comments,
            created_at: cached.created_at,
        }
    }
}

fn cache_key(user_id: Uuid) -> String {
    format!("chirp:cache:user:{}", user_id)
}

/// Get user from cache by ID
pub async fn get_cached_user(
    redis: &SharedConnectionManager,
    user_id: Uuid,
) -> Result<Option<CachedUser>, redis::RedisError> {
    let key = cache_key(user_id);
    let mut redis = redis.lock().await;
    let cached: Option<String> = run_with_timeout(
        redis::cmd("GET")
            .arg(&key)
            .query_async::<_, Option<String>>(&mut *redis),
    )
    .await?;

    if let Some(json_str) = cached {
        if let Ok(user) = serde_json::from_str::<CachedUser>(&json_str) {
            return Ok(Some(user));
        }
    }

    Ok(None)
}

/// Set user in cache with TTL
pub async fn set_cached_user(
    redis: &SharedConnectionManager,
    user: &CachedUser,
) -> Result<(), redis::RedisError> {
    let key = cache_key(user.id);
    let json = serde_json::to_string(user).map_err(|e| {
        tracing::error!("Failed to serialize user {} for cache: {}", user.id, e);
        redis::RedisError::from((redis::ErrorKind::TypeError, "user serialization failed"))
    })?;

    let mut redis = redis.lock().await;
    run_with_timeout(
        redis::cmd("SET")
            .arg(&key)
            .arg(&json)
            .arg("EX")
            .arg(USER_CACHE_TTL)
            .query_async::<_, ()>(&mut *redis),
    )
    .await?;

    Ok(())
}

/// Cache read with database fallback
///
/// A redis failure degrades to the DB path; a DB hit refreshes the cache
/// best-effort.
pub async fn get_user_with_fallback(
    redis: &SharedConnectionManager,
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    match get_cached_user(redis, user_id).await {
        Ok(Some(cached)) => return Ok(Some(cached.into())),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "user cache read failed, falling back to database");
        }
    }

    let user = user_repo::find_by_id(pool, user_id).await?;

    if let Some(user) = &user {
        if let Err(e) = set_cached_user(redis, &CachedUser::from(user.clone())).await {
            tracing::warn!(user_id = %user_id, error = %e, "user cache refresh failed");
        }
    }

    Ok(user)
}
