//! JWT session tokens
//!
//! Tokens carry `{userId, iat, exp}` and are signed with HS256 using the one
//! secret configured for the process. Nothing about issued tokens is stored
//! server side.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default token lifetime: one day.
pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// JWT token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Identity of the account the token was issued to
    #[serde(rename = "userId")]
    pub user_id: i32,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user_id: i32, issued_at: DateTime<Utc>, config: &JwtConfig) -> Self {
        let exp = issued_at + Duration::hours(config.expiration_hours);
        Self {
            user_id,
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Create a token for a user, issued now
pub fn create_token(user_id: i32, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    create_token_at(user_id, Utc::now(), config)
}

/// Create a token as if it had been issued at `issued_at`
pub fn create_token_at(
    user_id: i32,
    issued_at: DateTime<Utc>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(user_id, issued_at, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the embedded claims
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}
