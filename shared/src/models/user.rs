//! User Model

use serde::{Deserialize, Serialize};

/// User account entity
///
/// Credential and verification-code fields never leave the server:
/// they are skipped on serialization and default on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Argon2 password hash (server-internal)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Whether the email has been verified via one-time code
    pub verified: bool,
    /// One-time verification code (server-internal)
    #[serde(skip_serializing, default)]
    pub otp_code: Option<String>,
    /// Expiry of the verification code, Unix millis (server-internal)
    #[serde(skip_serializing, default)]
    pub otp_expires_at: Option<i64>,
    /// Disabled accounts cannot log in
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}
