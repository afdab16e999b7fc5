//! Post endpoints (the minimum the comment flow needs)

use crate::app_state::AppState;
use crate::db::post_repo;
use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::models::post::CreatePostRequest;
use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let post =
        post_repo::create_post(&state.pool, user.id, &user.username, &payload.content).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Post created successfully",
        "post": post,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    responses(
        (status = 200, description = "Post found"),
        (status = 404, description = "No post with this id"),
    ),
    tag = "posts"
)]
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = post_repo::find_by_id(&state.pool, *post_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post found",
        "post": post,
    })))
}
