//! Chat message endpoints
//!
//! Every mutation is deferred through the chat queue; the send path also
//! pushes the message to the receiver's socket room immediately.

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::chat::{AddChatMessageRequest, MarkMessagesReadRequest, MessageReactionRequest};
use crate::queues::{AddChatMessageJob, MarkDeletedJob, MarkReadJob, ReactionJob};
use crate::websocket::EVENT_MESSAGE_RECEIVED;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/chat/message",
    request_body = AddChatMessageRequest,
    responses((status = 200, description = "Message accepted")),
    security(("bearer_auth" = [])),
    tag = "chat"
)]
pub async fn add_message(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<AddChatMessageRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    // Mint the id here so the receiver's push and the DB row agree.
    let message_id = Uuid::new_v4();
    let job = AddChatMessageJob {
        message_id,
        conversation_id: payload.conversation_id,
        sender_id: user.id,
        receiver_id: payload.receiver_id,
        body: payload.body.clone(),
    };

    state.chat_queue.add_message_job(&job).await?;

    state.socket_registry.emit(
        payload.receiver_id,
        EVENT_MESSAGE_RECEIVED,
        serde_json::json!({
            "id": message_id,
            "conversation_id": payload.conversation_id,
            "sender_id": user.id,
            "sender_username": user.username,
            "body": payload.body,
            "created_at": Utc::now(),
        }),
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Message added",
        "message_id": message_id,
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/chat/message/read",
    request_body = MarkMessagesReadRequest,
    responses((status = 200, description = "Mark-as-read accepted")),
    security(("bearer_auth" = [])),
    tag = "chat"
)]
pub async fn mark_messages_read(
    state: web::Data<AppState>,
    _user: AuthUser,
    payload: web::Json<MarkMessagesReadRequest>,
) -> Result<HttpResponse> {
    state
        .chat_queue
        .mark_read_job(&MarkReadJob {
            conversation_id: payload.conversation_id,
            sender_id: payload.sender_id,
            receiver_id: payload.receiver_id,
        })
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Message marked as read",
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/chat/message/reaction",
    request_body = MessageReactionRequest,
    responses((status = 200, description = "Reaction accepted")),
    security(("bearer_auth" = [])),
    tag = "chat"
)]
pub async fn update_reaction(
    state: web::Data<AppState>,
    _user: AuthUser,
    payload: web::Json<MessageReactionRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    state
        .chat_queue
        .reaction_job(&ReactionJob {
            message_id: payload.message_id,
            reaction: payload.reaction.clone(),
        })
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Message reaction added",
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/chat/message/{message_id}",
    responses((status = 200, description = "Deletion accepted")),
    security(("bearer_auth" = [])),
    tag = "chat"
)]
pub async fn delete_message(
    state: web::Data<AppState>,
    _user: AuthUser,
    message_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .chat_queue
        .mark_deleted_job(&MarkDeletedJob {
            message_id: *message_id,
        })
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Message marked as deleted",
    })))
}
