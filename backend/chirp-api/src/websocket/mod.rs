pub mod registry;
pub mod session;

pub use registry::{SocketEvent, SocketRegistry};
pub use session::WsSession;

/// Event names pushed to connected clients
pub const EVENT_INSERT_NOTIFICATION: &str = "insert notification";
pub const EVENT_UPDATE_NOTIFICATION: &str = "update notification";
pub const EVENT_DELETE_NOTIFICATION: &str = "delete notification";
pub const EVENT_MESSAGE_RECEIVED: &str = "message received";
