//! Websocket upgrade endpoint
//!
//! Browsers cannot set headers on the upgrade request, so authentication
//! rides on the `token` query parameter.

use crate::app_state::AppState;
use crate::security::jwt;
use crate::websocket::WsSession;
use actix_web::{error::ErrorUnauthorized, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: String,
}

pub async fn notifications_ws(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
    query: web::Query<WsQuery>,
) -> Result<HttpResponse, Error> {
    let token_data = jwt::validate_token(&state.settings.jwt.secret, &query.token)
        .map_err(|_| ErrorUnauthorized("Invalid or expired token"))?;

    let user_id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| ErrorUnauthorized("Invalid user ID in token"))?;

    ws::start(
        WsSession::new(user_id, state.socket_registry.clone()),
        &req,
        stream,
    )
}
