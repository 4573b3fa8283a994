//! JWT Token Handler
//! Mission: Sign and verify session tokens with the server secret

use crate::auth::models::{Claims, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::fmt;
use tracing::{debug, warn};

/// Session lifetime
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Token failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// No server secret configured
    MissingSecret,
    Expired,
    /// Bad signature, unexpected algorithm or malformed claims
    Invalid,
    Signing,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::MissingSecret => write!(f, "token secret is not configured"),
            TokenError::Expired => write!(f, "token has expired"),
            TokenError::Invalid => write!(f, "token is invalid"),
            TokenError::Signing => write!(f, "failed to sign token"),
        }
    }
}

impl std::error::Error for TokenError {}

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: Option<String>,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a handler. An empty secret counts as missing.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            ttl: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    /// Override the token lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Generate a signed token for a user
    pub fn generate_token(&self, user: &User) -> Result<String, TokenError> {
        let secret = self.secret.as_deref().ok_or(TokenError::MissingSecret)?;

        let expiration = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::Signing)?
            .timestamp();

        let claims = Claims {
            sub: user.id,
            exp: expiration,
        };

        debug!(
            "Generating JWT for user {} ({}), expires in {}d",
            user.username,
            user.id,
            self.ttl.num_days()
        );

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| {
            warn!("Failed to sign JWT: {}", e);
            TokenError::Signing
        })
    }

    /// Validate a token and extract its claims.
    ///
    /// Only the HMAC family is accepted and expiry is checked with no leeway.
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let secret = self.secret.as_deref().ok_or(TokenError::MissingSecret)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        debug!("Validated JWT for user {}", decoded.claims.sub);

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use serde::Serialize;

    const SECRET: &str = "test-secret-key-12345";

    fn create_test_user() -> User {
        User {
            id: 42,
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    fn handler() -> JwtHandler {
        JwtHandler::new(Some(SECRET.to_string()))
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let handler = handler();
        let user = create_test_user();

        let token = handler.generate_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = handler.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);

        let expected = Utc::now().timestamp() + TOKEN_TTL_DAYS * 24 * 3600;
        assert!((claims.exp - expected).abs() <= 5);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = handler().validate_token("invalid.token.here");
        assert_eq!(result, Err(TokenError::Invalid));
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new(Some("secret1".to_string()));
        let handler2 = JwtHandler::new(Some("secret2".to_string()));

        let token = handler1.generate_token(&create_test_user()).unwrap();

        assert_eq!(handler2.validate_token(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = handler().with_ttl(Duration::hours(-1));
        let token = expired.generate_token(&create_test_user()).unwrap();

        assert_eq!(handler().validate_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_missing_secret() {
        let handler = JwtHandler::new(None);
        assert!(!handler.has_secret());
        assert_eq!(
            handler.generate_token(&create_test_user()),
            Err(TokenError::MissingSecret)
        );
        assert_eq!(handler.validate_token("a.b.c"), Err(TokenError::MissingSecret));

        // empty env value
        assert!(!JwtHandler::new(Some(String::new())).has_secret());
    }

    #[test]
    fn test_other_hmac_variants_accepted() {
        let claims = Claims {
            sub: 42,
            exp: Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(handler().validate_token(&token).unwrap(), claims);
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let exp = Utc::now().timestamp() + 600;
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":42,"exp":{}}}"#, exp));
        let signature = URL_SAFE_NO_PAD.encode("not-a-real-signature");
        let token = format!("{}.{}.{}", header, payload, signature);

        assert_eq!(handler().validate_token(&token), Err(TokenError::Invalid));

        let unsigned = format!(
            "{}.{}.",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#),
            payload
        );
        assert_eq!(handler().validate_token(&unsigned), Err(TokenError::Invalid));
    }

    #[test]
    fn test_string_subject_rejected() {
        #[derive(Serialize)]
        struct LooseClaims {
            sub: &'static str,
            exp: i64,
        }

        for sub in ["not-a-number", "42"] {
            let token = encode(
                &Header::new(Algorithm::HS256),
                &LooseClaims {
                    sub,
                    exp: Utc::now().timestamp() + 600,
                },
                &EncodingKey::from_secret(SECRET.as_bytes()),
            )
            .unwrap();

            assert_eq!(handler().validate_token(&token), Err(TokenError::Invalid));
        }
    }
}
