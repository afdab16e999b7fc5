//! Notification repository

use crate::models::notification::NewNotification;
use crate::models::Notification;
use sqlx::PgPool;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str = "id, user_to, user_from, notification_type, message, \
     entity_id, created_item_id, read, created_at";

/// Insert a notification keyed by the item that caused it.
///
/// `created_item_id` is unique, so a redelivered fan-out job inserts
/// nothing and gets `None` back.
pub async fn insert_notification(
    pool: &PgPool,
    params: &NewNotification,
) -> Result<Option<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        r#"
        INSERT INTO notifications
            (user_to, user_from, notification_type, message, entity_id, created_item_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (created_item_id) DO NOTHING
        RETURNING {NOTIFICATION_COLUMNS}
        "#,
    ))
    .bind(params.user_to)
    .bind(params.user_from)
    .bind(&params.notification_type)
    .bind(&params.message)
    .bind(params.entity_id)
    .bind(params.created_item_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_created_item(
    pool: &PgPool,
    created_item_id: Uuid,
) -> Result<Option<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE created_item_id = $1",
    ))
    .bind(created_item_id)
    .fetch_optional(pool)
    .await
}

/// Notifications for one recipient, newest first
pub async fn get_notifications(
    pool: &PgPool,
    user_to: Uuid,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        r#"
        SELECT {NOTIFICATION_COLUMNS} FROM notifications
        WHERE user_to = $1
        ORDER BY created_at DESC
        "#,
    ))
    .bind(user_to)
    .fetch_all(pool)
    .await
}

pub async fn mark_as_read(pool: &PgPool, notification_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
        .bind(notification_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_notification(pool: &PgPool, notification_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM notifications WHERE id = $1")
        .bind(notification_id)
        .execute(pool)
        .await?;
    Ok(())
}
