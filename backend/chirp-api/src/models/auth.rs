//! Auth account model and request payloads for the auth endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Credential row. Password material never leaves this module's consumers.
#[derive(Debug, Clone, FromRow)]
pub struct AuthRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_color: String,
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 4, max = 8, message = "Invalid username"))]
    pub username: String,
    #[validate(length(min = 4, max = 8, message = "Invalid password"))]
    pub password: String,
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Avatar color is required"))]
    pub avatar_color: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    #[validate(length(min = 4, max = 8, message = "Invalid username"))]
    pub username: String,
    #[validate(length(min = 4, max = 8, message = "Invalid password"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Field must be valid"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 4, max = 8, message = "Invalid password"))]
    pub password: String,
    #[validate(length(min = 4, max = 8, message = "Invalid password"))]
    pub confirm_password: String,
}

/// Public view of an account, returned from signup/signin
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_color: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AuthRecord> for AuthUserView {
    fn from(record: &AuthRecord) -> Self {
        AuthUserView {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            avatar_color: record.avatar_color.clone(),
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_rejects_short_username() {
        let req = SignupRequest {
            username: "abc".to_string(),
            password: "pass1".to_string(),
            email: "abc@test.com".to_string(),
            avatar_color: "red".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn signup_rejects_long_password() {
        let req = SignupRequest {
            username: "manny".to_string(),
            password: "waytoolongpassword".to_string(),
            email: "manny@test.com".to_string(),
            avatar_color: "red".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn signup_accepts_valid_payload() {
        let req = SignupRequest {
            username: "manny".to_string(),
            password: "qwerty".to_string(),
            email: "manny@test.com".to_string(),
            avatar_color: "#9c27b0".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn forgot_password_rejects_invalid_email() {
        let req = ForgotPasswordRequest {
            email: "not-an-email".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
