//! Bearer token issue/verify (HS256 JWT).

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::claims::{TokenClaims, TokenValidationError, validate_claims};

/// Lifetime of a freshly issued session token.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, or not a JWT at all.
    #[error("malformed or tampered token")]
    Invalid,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Verifies a presented bearer token and returns its claims.
///
/// Verification never consults storage: revocation is the caller's concern.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError>;
}

/// HMAC-SHA256 token issuer and validator sharing one secret.
#[derive(Clone)]
pub struct Hs256Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl core::fmt::Debug for Hs256Tokens {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Tokens").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl Hs256Tokens {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        // Time-window checks are done by `validate_claims` against an explicit clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::days(DEFAULT_TOKEN_TTL_DAYS))
    }

    /// Sign a token binding to `subject`, valid for the configured TTL from `now`.
    pub fn issue(&self, subject: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims::new(subject, now, self.ttl);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        debug!(subject = %subject, exp = claims.exp, "issued bearer token");
        Ok(token)
    }
}

impl TokenValidator for Hs256Tokens {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Hs256Tokens {
        Hs256Tokens::with_default_ttl(b"test-secret-key-12345")
    }

    #[test]
    fn issued_token_validates_and_binds_subject() {
        let tokens = tokens();
        let subject = Uuid::now_v7();
        let now = Utc::now();

        let token = tokens.issue(subject, now).unwrap();
        let claims = tokens.validate(&token, now).unwrap();

        assert_eq!(claims.id, subject);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_DAYS * 24 * 3600);
    }

    #[test]
    fn token_expires_after_thirty_days() {
        let tokens = tokens();
        let now = Utc::now();
        let token = tokens.issue(Uuid::now_v7(), now).unwrap();

        let err = tokens.validate(&token, now + Duration::days(30)).unwrap_err();
        assert_eq!(err, TokenError::Claims(TokenValidationError::Expired));
        assert!(tokens.validate(&token, now + Duration::days(29)).is_ok());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = tokens().validate("invalid.token.here", Utc::now()).unwrap_err();
        assert_eq!(err, TokenError::Invalid);
    }

    #[test]
    fn different_secrets_reject() {
        let issuer = Hs256Tokens::with_default_ttl(b"secret1");
        let verifier = Hs256Tokens::with_default_ttl(b"secret2");
        let now = Utc::now();

        let token = issuer.issue(Uuid::now_v7(), now).unwrap();
        assert_eq!(verifier.validate(&token, now).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn debug_output_hides_key_material() {
        let rendered = format!("{:?}", tokens());
        assert!(!rendered.contains("test-secret"));
    }
}
