//! Connection registry for realtime push
//!
//! Rooms are keyed by user id; a user may hold several open connections
//! (multiple tabs/devices). Emitting to an empty room is a silent no-op.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// A named event with a JSON payload, as delivered to the client
#[derive(Debug, Clone, Serialize)]
pub struct SocketEvent {
    pub event: String,
    pub data: serde_json::Value,
}

struct Connection {
    id: u64,
    sender: mpsc::UnboundedSender<SocketEvent>,
}

#[derive(Default)]
struct Inner {
    rooms: HashMap<uuid::Uuid, Vec<Connection>>,
}

/// Shared registry of open websocket connections
#[derive(Clone)]
pub struct SocketRegistry {
    inner: Arc<RwLock<Inner>>,
    next_id: Arc<AtomicU64>,
}

impl SocketRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a connection for a user. Returns the connection id and the
    /// receiving end the session drains.
    pub fn subscribe(
        &self,
        user_id: uuid::Uuid,
    ) -> (u64, mpsc::UnboundedReceiver<SocketEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.write();
        inner
            .rooms
            .entry(user_id)
            .or_default()
            .push(Connection { id: conn_id, sender: tx });
        (conn_id, rx)
    }

    /// Remove a single connection; drops the room when it empties.
    pub fn unsubscribe(&self, user_id: uuid::Uuid, conn_id: u64) {
        let mut inner = self.write();
        if let Some(connections) = inner.rooms.get_mut(&user_id) {
            connections.retain(|c| c.id != conn_id);
            if connections.is_empty() {
                inner.rooms.remove(&user_id);
            }
        }
    }

    /// Push an event to every open connection of the recipient.
    /// Closed connections are pruned on the way; an empty room is a no-op.
    pub fn emit(&self, user_id: uuid::Uuid, event: &str, data: serde_json::Value) {
        let mut inner = self.write();
        let Some(connections) = inner.rooms.get_mut(&user_id) else {
            return;
        };

        connections.retain(|c| {
            c.sender
                .send(SocketEvent {
                    event: event.to_string(),
                    data: data.clone(),
                })
                .is_ok()
        });
        if connections.is_empty() {
            inner.rooms.remove(&user_id);
        }
    }

    pub fn connection_count(&self, user_id: uuid::Uuid) -> usize {
        self.read()
            .rooms
            .get(&user_id)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SocketRegistry {
    fn default() -> Self {
        Self::new()
    }
}
