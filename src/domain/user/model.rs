use chrono::{DateTime, Utc};

/// Credit granted to every account at signup.
pub const INITIAL_CREDIT: i64 = 10;

/// User model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Encoded digest, never the plaintext secret
    pub password_hash: String,
    pub credit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
