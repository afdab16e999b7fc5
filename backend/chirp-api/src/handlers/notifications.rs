//! Notification endpoints
//!
//! Reads are served from the database; mutations are deferred through the
//! notification queue.

use crate::app_state::AppState;
use crate::db::notification_repo;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::queues::NotificationJob;
use crate::websocket::{EVENT_DELETE_NOTIFICATION, EVENT_UPDATE_NOTIFICATION};
use actix_web::{web, HttpResponse};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses((status = 200, description = "Notifications for the current user")),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn get_notifications(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let notifications = notification_repo::get_notifications(&state.pool, user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User notifications",
        "notifications": notifications,
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}",
    responses((status = 200, description = "Mark-as-read accepted")),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn update_notification(
    state: web::Data<AppState>,
    user: AuthUser,
    notification_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .notification_queue
        .update_notification_job(&NotificationJob {
            notification_id: *notification_id,
        })
        .await?;

    // Other open tabs of the same user see the read state change.
    state.socket_registry.emit(
        user.id,
        EVENT_UPDATE_NOTIFICATION,
        serde_json::json!({ "id": *notification_id }),
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Notification marked as read",
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    responses((status = 200, description = "Deletion accepted")),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn delete_notification(
    state: web::Data<AppState>,
    user: AuthUser,
    notification_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .notification_queue
        .delete_notification_job(&NotificationJob {
            notification_id: *notification_id,
        })
        .await?;

    state.socket_registry.emit(
        user.id,
        EVENT_DELETE_NOTIFICATION,
        serde_json::json!({ "id": *notification_id }),
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Notification deleted successfully",
    })))
}
