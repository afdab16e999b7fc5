pub mod auth;
pub mod chat;
pub mod comments;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod users;
pub mod ws;

use crate::error::{ApiError, Result};

/// Password pair guard shared by the reset and change flows. Runs before any
/// store access so a mismatch never mutates anything or queues an email.
pub(crate) fn ensure_passwords_match(new_password: &str, confirm_password: &str) -> Result<()> {
    if new_password != confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_pair_is_rejected_with_the_canonical_message() {
        let err = ensure_passwords_match("qwerty", "qwertz").unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Passwords do not match"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn matching_pair_passes() {
        assert!(ensure_passwords_match("qwerty", "qwerty").is_ok());
    }
}
