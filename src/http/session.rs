//! Synthetic session tokens
//!
//! The reviews endpoint wants an Amazon-style session id on every request but
//! never checks it against anything, so each call gets a freshly made-up one.

use chrono::Utc;

/// Produces the session token sent with a request
pub trait SessionTokenGenerator: Send + Sync {
    /// Generate the token for the next request
    fn next_token(&self) -> String;
}

/// `NNN-NNNNNNN-NNNNNNN`: two random groups and the wall clock in millis
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSessionToken;

impl SessionTokenGenerator for RandomSessionToken {
    fn next_token(&self) -> String {
        let prefix: u32 = rand::random_range(100..=999);
        let middle: u32 = rand::random_range(1_000_000..=9_999_999);
        let suffix = Utc::now().timestamp_millis().rem_euclid(10_000_000);
        format!("{prefix}-{middle}-{suffix}")
    }
}

/// Always hands out the same token
#[derive(Debug, Clone)]
pub struct FixedSessionToken(String);

impl FixedSessionToken {
    /// Use `token` for every request
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl SessionTokenGenerator for FixedSessionToken {
    fn next_token(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_token_shape() {
        let token = RandomSessionToken.next_token();
        let parts: Vec<&str> = token.split('-').collect();
        assert_eq!(parts.len(), 3, "unexpected token {token}");

        let prefix: u32 = parts[0].parse().unwrap();
        let middle: u32 = parts[1].parse().unwrap();
        let suffix: u64 = parts[2].parse().unwrap();
        assert!((100..=999).contains(&prefix));
        assert!((1_000_000..=9_999_999).contains(&middle));
        assert!(suffix < 10_000_000);
    }

    #[test]
    fn test_fixed_token() {
        let generator = FixedSessionToken::new("123-4567890-1234567");
        assert_eq!(generator.next_token(), "123-4567890-1234567");
        assert_eq!(generator.next_token(), "123-4567890-1234567");
    }
}
