//! API error types
//!
//! Every error serializes to the wire as
//! `{ "message": ..., "status": "error", "statusCode": ... }`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Queue error: {0}")]
    Queue(#[from] job_queue::QueueError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Message exposed to API clients. Internal detail stays in the logs.
    fn client_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Database(_)
            | ApiError::Cache(_)
            | ApiError::Queue(_)
            | ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_)
            | ApiError::Cache(_)
            | ApiError::Queue(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "message": self.client_message(),
            "status": "error",
            "statusCode": status.as_u16(),
        }))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Surface the first field message, same shape as any other 400.
        let message = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid request".to_string());
        ApiError::BadRequest(message)
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "token error");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct UsernameForm {
        #[validate(length(min = 4, max = 8, message = "Invalid username"))]
        username: String,
    }

    #[test]
    fn bad_request_maps_to_400() {
        let err = ApiError::BadRequest("Invalid credentials".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Invalid credentials");
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let err = ApiError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn validation_errors_surface_field_message() {
        let form = UsernameForm {
            username: "ab".to_string(),
        };
        let err: ApiError = form.validate().unwrap_err().into();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Invalid username"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
