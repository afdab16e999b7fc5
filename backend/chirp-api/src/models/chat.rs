//! Chat message model and the mutation payloads for the chat endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    pub reaction: Option<String>,
    pub is_read: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AddChatMessageRequest {
    pub conversation_id: Uuid,
    pub receiver_id: Uuid,
    #[validate(length(min = 1, message = "Message body is required"))]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MarkMessagesReadRequest {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct MessageReactionRequest {
    pub message_id: Uuid,
    #[validate(length(min = 1, message = "Reaction is required"))]
    pub reaction: String,
}
