//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_to: Uuid,
    pub user_from: Uuid,
    pub notification_type: String,
    pub message: String,
    pub entity_id: Uuid,
    pub created_item_id: Uuid,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert parameters for a new notification row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_to: Uuid,
    pub user_from: Uuid,
    pub notification_type: String,
    pub message: String,
    pub entity_id: Uuid,
    pub created_item_id: Uuid,
}
