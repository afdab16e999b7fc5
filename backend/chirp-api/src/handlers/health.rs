//! Liveness and readiness probes

use crate::app_state::AppState;
use actix_web::{web, HttpResponse};
use redis_utils::run_with_timeout;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
    }))
}

/// Readiness: both the database and Redis must answer
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    let db_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    let redis_ok = {
        let mut redis = state.redis.lock().await;
        run_with_timeout(redis::cmd("PING").query_async::<_, String>(&mut *redis))
            .await
            .is_ok()
    };

    if db_ok && redis_ok {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "database": "up",
            "redis": "up",
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "not ready",
            "database": if db_ok { "up" } else { "down" },
            "redis": if redis_ok { "up" } else { "down" },
        }))
    }
}
