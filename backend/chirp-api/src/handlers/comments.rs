//! Comment endpoints
//!
//! Creation is deferred: the handler validates, resolves the post owner, and
//! enqueues `addCommentToDB`; the comment worker does the insert, the counter
//! bump and the notification fan-out.

use crate::app_state::AppState;
use crate::db::{comment_repo, post_repo};
use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::models::comment::CreateCommentRequest;
use crate::queues::CommentJob;
use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment accepted"),
        (status = 404, description = "Parent post does not exist"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let post = post_repo::find_by_id(&state.pool, payload.post_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    // Mint the id here so redeliveries of the job stay idempotent.
    let comment_id = Uuid::new_v4();

    state
        .comment_queue
        .add_comment_job(&CommentJob {
            comment_id,
            post_id: post.id,
            user_from: user.id,
            user_to: post.user_id,
            username: user.username.clone(),
            avatar_color: user.avatar_color.clone(),
            comment: payload.comment.clone(),
        })
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment created successfully",
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/comments/{post_id}",
    responses((status = 200, description = "Comments for a post, newest first")),
    tag = "comments"
)]
pub async fn get_comments(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = comment_repo::get_comments_by_post(&state.pool, *post_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post comments",
        "comments": comments,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/comments/names/{post_id}",
    responses((status = 200, description = "Distinct commenter usernames and total count")),
    tag = "comments"
)]
pub async fn get_comment_names(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let names = comment_repo::get_comment_names(&state.pool, *post_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post comments names",
        "comments": names,
    })))
}
