//! Session token utilities.
//!
//! Activation mints a long-lived HS256 session token that the browser hands
//! to the auth provider as both access and refresh credential. Tokens are
//! never persisted server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Session token lifetime: one year.
pub const SESSION_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Audience and role claim value expected by the auth provider.
pub const AUTHENTICATED: &str = "authenticated";

/// Error type for session token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Audience
    pub aud: String,
    /// Role granted to the session
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Provider metadata consumed by the auth backend
    pub app_metadata: AppMetadata,
    /// Free-form user metadata (empty object for activation tokens)
    pub user_metadata: serde_json::Value,
}

/// Provider metadata embedded in every activation token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    pub provider: String,
    pub providers: Vec<String>,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            provider: "phone".to_string(),
            providers: vec!["phone".to_string()],
        }
    }
}

/// Signs and verifies session tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    /// Creates a signer from the shared secret.
    ///
    /// An empty secret is a configuration error, not a signable key.
    pub fn from_secret(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Mints a session token for the given user with a one-year expiry.
    pub fn mint(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            aud: AUTHENTICATED.to_string(),
            role: AUTHENTICATED.to_string(),
            exp: (now + Duration::seconds(SESSION_TOKEN_TTL_SECS)).timestamp(),
            iat: now.timestamp(),
            app_metadata: AppMetadata::default(),
            user_metadata: serde_json::json!({}),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingError(e.to_string()))
    }

    /// Verifies a session token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[AUTHENTICATED]);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidToken
                    | jsonwebtoken::errors::ErrorKind::InvalidSignature
                    | jsonwebtoken::errors::ErrorKind::InvalidAudience => TokenError::InvalidToken,
                    _ => TokenError::DecodingError(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

/// Extracts the user ID from validated claims.
pub fn extract_user_id(claims: &SessionClaims) -> Result<Uuid, TokenError> {
    Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidToken)
}
