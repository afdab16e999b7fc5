//! Signup, signin and password recovery endpoints

use crate::app_state::AppState;
use crate::cache::user_cache::{self, CachedUser};
use crate::db::auth_repo;
use crate::error::{ApiError, Result};
use crate::models::auth::{
    AuthUserView, ForgotPasswordRequest, ResetPasswordRequest, SigninRequest, SignupRequest,
};
use crate::queues::{AuthJob, EmailJob, UserJob, JOB_CHANGE_PASSWORD_EMAIL, JOB_FORGOT_PASSWORD_EMAIL};
use crate::security::reset_token::{generate_reset_token, hash_reset_token};
use crate::security::{jwt, password};
use crate::services::templates;
use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

const RESET_TOKEN_TTL_HOURS: i64 = 1;

fn issue_token(state: &AppState, view: &AuthUserView) -> Result<String> {
    jwt::generate_token(
        &state.settings.jwt.secret,
        state.settings.jwt.expiry_seconds,
        view.id,
        &view.username,
        &view.email,
        &view.avatar_color,
    )
}

/// Create an account. The credential and profile rows are persisted
/// write-behind by the auth/user queues; the profile is visible immediately
/// through the user cache.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Validation failure or duplicate credentials"),
    ),
    tag = "auth"
)]
pub async fn signup(
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let existing =
        auth_repo::find_by_username_or_email(&state.pool, &payload.username, &payload.email)
            .await?;
    if existing.is_some() {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    let user_id = Uuid::new_v4();
    let password_hash = password::hash_password(&payload.password)?;
    let created_at = Utc::now();

    let cached = CachedUser {
        id: user_id,
        username: payload.username.clone(),
        email: payload.email.clone(),
        avatar_color: payload.avatar_color.clone(),
        notify_messages: true,
        notify_comments: true,
        created_at,
    };
    if let Err(e) = user_cache::set_cached_user(&state.redis, &cached).await {
        tracing::warn!(user_id = %user_id, error = %e, "signup cache write failed");
    }

    state
        .auth_queue
        .add_auth_user_job(&AuthJob {
            id: user_id,
            username: payload.username.clone(),
            email: payload.email.clone(),
            password_hash,
            avatar_color: payload.avatar_color.clone(),
        })
        .await?;
    state
        .user_queue
        .add_user_job(&UserJob {
            id: user_id,
            username: payload.username.clone(),
            email: payload.email.clone(),
            avatar_color: payload.avatar_color.clone(),
        })
        .await?;

    let view = AuthUserView {
        id: user_id,
        username: payload.username.clone(),
        email: payload.email.clone(),
        avatar_color: payload.avatar_color.clone(),
        created_at,
    };
    let token = issue_token(&state, &view)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User created successfully",
        "user": view,
        "token": token,
    })))
}

/// Authenticate with username and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Authenticated"),
        (status = 400, description = "Unknown user or wrong password"),
    ),
    tag = "auth"
)]
pub async fn signin(
    state: web::Data<AppState>,
    payload: web::Json<SigninRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let auth = auth_repo::find_by_username(&state.pool, &payload.username)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    if !password::verify_password(&payload.password, &auth.password_hash)? {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    let view = AuthUserView::from(&auth);
    let token = issue_token(&state, &view)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User login successfully",
        "user": view,
        "token": token,
    })))
}

/// Issue a password reset token and email the reset link
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email queued"),
        (status = 400, description = "Unknown email"),
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    state: web::Data<AppState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let auth = auth_repo::find_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    let raw_token = generate_reset_token();
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
    auth_repo::set_reset_token(&state.pool, auth.id, &hash_reset_token(&raw_token), expires_at)
        .await?;

    let reset_link = format!(
        "{}/reset-password?token={}",
        state.settings.client.url, raw_token
    );
    state
        .email_queue
        .add_email_job(
            JOB_FORGOT_PASSWORD_EMAIL,
            &EmailJob {
                receiver_email: auth.email.clone(),
                subject: "Reset your password".to_string(),
                template: templates::forgot_password_template(&auth.username, &reset_link),
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password reset email sent",
    })))
}

/// Consume a reset token and set the new password
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password/{token}",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Mismatched passwords or invalid token"),
    ),
    tag = "auth"
)]
pub async fn reset_password(
    state: web::Data<AppState>,
    token: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    super::ensure_passwords_match(&payload.password, &payload.confirm_password)?;

    let token_hash = hash_reset_token(&token);
    let auth = auth_repo::find_by_valid_reset_token(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Reset token has expired".to_string()))?;

    let password_hash = password::hash_password(&payload.password)?;
    let consumed =
        auth_repo::reset_password_by_token(&state.pool, &token_hash, &password_hash).await?;
    if !consumed {
        // Token raced with another reset between lookup and update.
        return Err(ApiError::BadRequest("Reset token has expired".to_string()));
    }

    state
        .email_queue
        .add_email_job(
            JOB_CHANGE_PASSWORD_EMAIL,
            &EmailJob {
                receiver_email: auth.email.clone(),
                subject: "Password update confirmation".to_string(),
                template: templates::password_updated_template(
                    &auth.username,
                    &auth.email,
                    &Utc::now().format("%Y-%m-%d %H:%M").to_string(),
                ),
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password successfully updated",
    })))
}

/// Stateless signout; the client discards its token
pub async fn signout() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Logout successful",
    }))
}
