//! Authenticated user endpoints

use crate::app_state::AppState;
use crate::db::auth_repo;
use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::models::user::ChangePasswordRequest;
use crate::queues::{EmailJob, JOB_CHANGE_PASSWORD_EMAIL};
use crate::security::password;
use crate::services::templates;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use validator::Validate;

/// Change the current user's password
#[utoipa::path(
    put,
    path = "/api/v1/users/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Mismatched passwords or wrong current password"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn change_password(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    super::ensure_passwords_match(&payload.new_password, &payload.confirm_password)?;

    let auth = auth_repo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    if !password::verify_password(&payload.current_password, &auth.password_hash)? {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    let password_hash = password::hash_password(&payload.new_password)?;
    auth_repo::update_password(&state.pool, auth.id, &password_hash).await?;

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
        "message": "Password updated successfully. You will be redirected shortly to the login page.",
    })))
}
