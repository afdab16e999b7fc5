//! Per-connection websocket session actor
//!
//! Registers itself in the [`SocketRegistry`] on start and forwards the
//! room's events to the client as JSON text frames.

use super::registry::{SocketEvent, SocketRegistry};
use actix::prelude::*;
use actix_web_actors::ws;
use std::time::{Duration, Instant};
use uuid::Uuid;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Message)]
#[rtype(result = "()")]
struct PushEvent(SocketEvent);

pub struct WsSession {
    user_id: Uuid,
    registry: SocketRegistry,
    conn_id: Option<u64>,
    hb: Instant,
}

impl WsSession {
    pub fn new(user_id: Uuid, registry: SocketRegistry) -> Self {
        Self {
            user_id,
            registry,
            conn_id: None,
            hb: Instant::now(),
        }
    }

    fn heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::debug!(user_id = %act.user_id, "websocket heartbeat timed out, closing");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.heartbeat(ctx);

        let (conn_id, mut rx) = self.registry.subscribe(self.user_id);
        self.conn_id = Some(conn_id);
        tracing::debug!(user_id = %self.user_id, conn_id, "websocket session started");

        // Forward room events into the actor mailbox. The loop ends when the
        // registry drops our sender on unsubscribe.
        let addr = ctx.address();
        actix::spawn(async move {
            while let Some(event) = rx.recv().await {
                addr.do_send(PushEvent(event));
            }
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(conn_id) = self.conn_id.take() {
            self.registry.unsubscribe(self.user_id, conn_id);
            tracing::debug!(user_id = %self.user_id, conn_id, "websocket session stopped");
        }
    }
}

impl Handler<PushEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: PushEvent, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg.0) {
            Ok(text) => ctx.text(text),
            Err(e) => tracing::error!(error = %e, "failed to serialize socket event"),
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(bytes)) => {
                self.hb = Instant::now();
                ctx.pong(&bytes);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Text(_)) | Ok(ws::Message::Binary(_)) => {
                // Push-only channel; client frames are ignored.
                self.hb = Instant::now();
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "websocket protocol error");
                ctx.stop();
            }
        }
    }
}
