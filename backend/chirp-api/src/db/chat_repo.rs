//! Chat message repository

use crate::models::ChatMessage;
use sqlx::PgPool;
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, receiver_id, body, reaction, \
     is_read, deleted, created_at";

pub async fn insert_message(
    pool: &PgPool,
    id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    body: &str,
) -> Result<ChatMessage, sqlx::Error> {
    sqlx::query_as::<_, ChatMessage>(&format!(
        r#"
        INSERT INTO chat_messages (id, conversation_id, sender_id, receiver_id, body)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {MESSAGE_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(conversation_id)
    .bind(sender_id)
    .bind(receiver_id)
    .bind(body)
    .fetch_one(pool)
    .await
}

pub async fn mark_message_deleted(pool: &PgPool, message_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE chat_messages SET deleted = TRUE WHERE id = $1")
        .bind(message_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Mark every message the receiver has from the sender in a conversation
pub async fn mark_conversation_read(
    pool: &PgPool,
    conversation_id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE chat_messages
        SET is_read = TRUE
        WHERE conversation_id = $1 AND sender_id = $2 AND receiver_id = $3 AND is_read = FALSE
        "#,
    )
    .bind(conversation_id)
    .bind(sender_id)
    .bind(receiver_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn set_message_reaction(
    pool: &PgPool,
    message_id: Uuid,
    reaction: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE chat_messages SET reaction = $2 WHERE id = $1")
        .bind(message_id)
        .bind(reaction)
        .execute(pool)
        .await?;
    Ok(())
}
