/// Password reset token generation and hashing
///
/// The raw token (20 random bytes, hex-encoded) travels in the reset link.
/// Only its SHA-256 digest is stored, so a database leak never yields a
/// usable token.
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const RESET_TOKEN_BYTES: usize = 20;

/// Generate a raw reset token: 20 random bytes, hex-encoded
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a raw token for storage and lookup
pub fn hash_reset_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_40_hex_chars() {
        let token = generate_reset_token();
        assert_eq!(token.len(), RESET_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }

    #[test]
    fn hash_is_deterministic_and_distinct_from_token() {
        let token = generate_reset_token();
        let hash = hash_reset_token(&token);
        assert_eq!(hash, hash_reset_token(&token));
        assert_ne!(hash, token);
        assert_eq!(hash.len(), 64);
    }
}
