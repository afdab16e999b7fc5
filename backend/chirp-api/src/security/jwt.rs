/// JWT generation and validation (HS256)
use crate::error::Result;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried in every access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Auth user id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub username: String,
    pub email: String,
    pub avatar_color: String,
}

/// Issue an access token for an authenticated user
pub fn generate_token(
    secret: &str,
    expiry_seconds: u64,
    user_id: Uuid,
    username: &str,
    email: &str,
    avatar_color: &str,
) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + expiry_seconds as i64,
        username: username.to_string(),
        email: email.to_string(),
        avatar_color: avatar_color.to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate a token's signature and expiry
pub fn validate_token(secret: &str, token: &str) -> Result<TokenData<Claims>> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret";

    #[test]
    fn round_trip_preserves_claims() {
        let user_id = Uuid::new_v4();
        let token =
            generate_token(SECRET, 3600, user_id, "manny", "manny@test.com", "red").unwrap();

        let data = validate_token(SECRET, &token).unwrap();
        assert_eq!(data.claims.sub, user_id.to_string());
        assert_eq!(data.claims.username, "manny");
        assert_eq!(data.claims.email, "manny@test.com");
        assert_eq!(data.claims.avatar_color, "red");
        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token =
            generate_token(SECRET, 3600, Uuid::new_v4(), "manny", "manny@test.com", "red")
                .unwrap();
        assert!(validate_token("other-secret", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
            username: "manny".to_string(),
            email: "manny@test.com".to_string(),
            avatar_color: "red".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(SECRET, &token).is_err());
    }
}
