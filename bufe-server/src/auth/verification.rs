//! Signed e-mail verification links
//!
//! The link carries a JWT whose `token` claim names the stored
//! verification row; the row decides whether it was already used.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PURPOSE: &str = "email_verification";

/// Verification token lifetime
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationClaims {
    pub purpose: String,
    /// User ID
    pub sub: String,
    pub username: String,
    /// Stored token value
    pub token: Uuid,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("verification link has expired")]
    Expired,
    #[error("verification link is invalid")]
    Invalid,
}

pub fn create_link_token(
    user_id: i64,
    username: &str,
    token: Uuid,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = VerificationClaims {
        purpose: PURPOSE.to_string(),
        sub: user_id.to_string(),
        username: username.to_string(),
        token,
        exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Check signature, expiry and purpose; returns (user id, token)
pub fn verify_link_token(jwt: &str, secret: &str) -> Result<(i64, Uuid), VerificationError> {
    let data = jsonwebtoken::decode::<VerificationClaims>(
        jwt,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => VerificationError::Expired,
        _ => VerificationError::Invalid,
    })?;

    let claims = data.claims;
    if claims.purpose != PURPOSE {
        return Err(VerificationError::Invalid);
    }
    let user_id = claims
        .sub
        .parse()
        .map_err(|_| VerificationError::Invalid)?;
    Ok((user_id, claims.token))
}
