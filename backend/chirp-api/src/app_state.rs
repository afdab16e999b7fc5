//! Shared application state
//!
//! Everything a handler or worker needs is constructed once at startup and
//! passed explicitly; there are no module-level singletons.

use crate::config::Settings;
use crate::queues::{
    AuthQueue, ChatQueue, CommentQueue, EmailQueue, NotificationQueue, UserQueue,
};
use crate::services::EmailService;
use crate::websocket::SocketRegistry;
use job_queue::Broker;
use redis_utils::SharedConnectionManager;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub pool: PgPool,
    pub redis: SharedConnectionManager,
    pub email_service: EmailService,
    pub socket_registry: SocketRegistry,
    pub email_queue: EmailQueue,
    pub auth_queue: AuthQueue,
    pub user_queue: UserQueue,
    pub comment_queue: CommentQueue,
    pub chat_queue: ChatQueue,
    pub notification_queue: NotificationQueue,
}

impl AppState {
    pub fn new(
        settings: Settings,
        pool: PgPool,
        redis: SharedConnectionManager,
        email_service: EmailService,
        broker: Arc<dyn Broker>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            pool,
            redis,
            email_service,
            socket_registry: SocketRegistry::new(),
            email_queue: EmailQueue::new(broker.clone()),
            auth_queue: AuthQueue::new(broker.clone()),
            user_queue: UserQueue::new(broker.clone()),
            comment_queue: CommentQueue::new(broker.clone()),
            chat_queue: ChatQueue::new(broker.clone()),
            notification_queue: NotificationQueue::new(broker),
        }
    }
}
