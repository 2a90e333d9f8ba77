//! Session token management for formbridge.
//!
//! Sessions are stateless signed JWTs bound to an account id. There is no
//! server-side revocation list; logout instructs the client to discard
//! the token.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session-related errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Token creation failed.
    #[error("failed to create session token: {0}")]
    TokenCreation(String),

    /// Token is absent, malformed, expired, or signed with the wrong key.
    #[error("invalid or expired session token")]
    InvalidToken,
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account ID).
    pub sub: i64,
    /// Account email at issuance time.
    pub email: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl SessionManager {
    /// Create a new session manager from a signing secret.
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: (ttl_days.max(0) as u64) * 24 * 60 * 60,
        }
    }

    /// Session validity in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a session token for an account.
    pub fn issue(&self, account_id: i64, email: &str) -> Result<String, SessionError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: account_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::TokenCreation(e.to_string()))
    }

    /// Verify a session token and return its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("session token rejected: {}", e);
                SessionError::InvalidToken
            })
    }
}
