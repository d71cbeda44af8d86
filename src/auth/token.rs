//! Signed session tokens.
//!
//! A token is an HS256 JWT carrying the user id (`sub`), the issue time and an
//! absolute expiry. Nothing is stored server side: a token is good exactly as
//! long as its signature checks out and `now < exp`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            },
        )?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::hours(1))
    }

    #[test]
    fn issued_token_verifies_to_the_same_user() {
        let tokens = service();
        let token = tokens.issue("user-1").unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_is_accepted_just_before_expiry() {
        let tokens = service();
        let issued = Utc::now();
        let token = tokens.issue_at("user-1", issued).unwrap();
        assert!(tokens.verify_at(&token, issued + Duration::minutes(59)).is_ok());
    }

    #[test]
    fn token_is_rejected_after_expiry() {
        let tokens = service();
        let issued = Utc::now();
        let token = tokens.issue_at("user-1", issued).unwrap();
        let err = tokens
            .verify_at(&token, issued + Duration::minutes(61))
            .unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn expired_token_is_rejected_by_wall_clock_verify() {
        let tokens = service();
        let token = tokens
            .issue_at("user-1", Utc::now() - Duration::minutes(61))
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let other = TokenService::new(b"other-secret", Duration::hours(1));
        let token = other.issue("user-1").unwrap();
        let err = service().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = service().verify("not.a.jwt").unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
        assert!(service().verify("").is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tokens = service();
        let token = tokens.issue("user-1").unwrap();
        let forged = tokens.issue("user-2").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
        assert!(tokens.verify(&spliced).is_err());
    }
}
