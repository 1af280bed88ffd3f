//! Session tokens and request extractors
//!
//! A session is an HS256 JWT carrying only the user id. Browsers get it in
//! the `bufe_session` cookie (HttpOnly, SameSite=Lax); API clients may send
//! it as `Authorization: Bearer <token>`. Every extractor reloads the user,
//! so the gate always sees current state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::User;

use super::gate::{Capability, GateContext, check_access};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "bufe_session";

const SESSION_DAYS: i64 = 14;

/// JWT claims of a session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Create a session token for a user
pub fn create_token(user_id: i64, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: (now + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a session token and return the user id it carries
pub fn verify_token(token: &str, secret: &str) -> Result<i64, jsonwebtoken::errors::Error> {
    let data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    data.claims
        .sub
        .parse()
        .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject.into())
}

/// `Set-Cookie` value that starts a session
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie::time::Duration::days(SESSION_DAYS))
        .build()
}

/// `Set-Cookie` value that ends a session
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie::time::Duration::ZERO)
        .build()
}

/// Session token from the cookie, falling back to a Bearer header
pub fn token_from_parts(parts: &Parts) -> Option<String> {
    let from_cookie = parts
        .headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string());

    from_cookie.or_else(|| {
        parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
    })
}

/// The logged-in user, if any. Invalid or expired tokens count as anonymous.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = token_from_parts(parts) else {
            return Ok(MaybeUser(None));
        };
        let user_id = match verify_token(&token, &state.session_secret) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!("Session token rejected: {e}");
                return Ok(MaybeUser(None));
            }
        };
        let user = state.store.get_user(user_id).await?;
        Ok(MaybeUser(user))
    }
}

/// A user passing the buffet gate
pub struct BuffetUser(pub User);

impl FromRequestParts<AppState> for BuffetUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        let ctx = GateContext {
            allowed_domains: &state.allowed_domains,
            admin_ids: &[],
        };
        check_access(user.as_ref(), Capability::Buffet, ctx)
            .map_err(|reason| reason.into_app_error(user.as_ref()))?;
        user.map(BuffetUser).ok_or_else(AppError::not_authenticated)
    }
}

/// A buffet administrator
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        let admin_ids = match &user {
            Some(_) => state.admin_ids().await?,
            None => Vec::new(),
        };
        let ctx = GateContext {
            allowed_domains: &state.allowed_domains,
            admin_ids: &admin_ids,
        };
        check_access(user.as_ref(), Capability::BuffetAdmin, ctx).map_err(|reason| {
            tracing::warn!(
                user_id = user.as_ref().map(|u| u.id),
                reason = reason.as_str(),
                "Admin access refused"
            );
            reason.into_app_error(user.as_ref())
        })?;
        user.map(AdminUser).ok_or_else(AppError::not_authenticated)
    }
}
