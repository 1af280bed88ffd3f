//! Account endpoints
//!
//! POST /auth/api/register               - create inactive user + send link
//! GET  /auth/email-confirmation/{token} - activate, start session, redirect /
//! POST /auth/api/resend-verification    - new link for an inactive user
//! POST /auth/api/login                  - start session
//! POST /auth/api/logout                 - end session
//! GET  /auth/api/user                   - current user

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserRepr};
use shared::util::now_millis;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::ApiResult;
use crate::auth::MaybeUser;
use crate::auth::session::{clear_session_cookie, create_token, session_cookie};
use crate::auth::verification::{
    TOKEN_TTL_HOURS, VerificationError, create_link_token, verify_link_token,
};
use crate::db::{NewUser, VerificationToken};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

// ── Request types ──

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Érvénytelen e-mail cím"))]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "A keresztnév 1-30 karakter lehet"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30, message = "A vezetéknév 1-30 karakter lehet"))]
    pub last_name: String,
    #[validate(length(min = 8, message = "A jelszónak legalább 8 karakterből kell állnia"))]
    pub password1: String,
    #[validate(must_match(other = "password1", message = "A két jelszó nem egyezik"))]
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    pub email: String,
}

// ── Helpers ──

/// First failing rule decides the code; every message lands in `details.fields`
fn validation_error(errors: &ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();

    let code = if field_errors.contains_key("password2") {
        ErrorCode::PasswordMismatch
    } else if field_errors.contains_key("password1") {
        ErrorCode::PasswordTooShort
    } else {
        ErrorCode::ValidationFailed
    };

    let mut fields = serde_json::Map::new();
    let mut first_message = None;
    for (field, errs) in &field_errors {
        let messages: Vec<String> = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        if first_message.is_none() {
            first_message = messages.first().cloned();
        }
        fields.insert(field.to_string(), json!(messages));
    }

    let message = match code {
        ErrorCode::PasswordMismatch => "A két jelszó nem egyezik".to_string(),
        ErrorCode::PasswordTooShort => {
            "A jelszónak legalább 8 karakterből kell állnia".to_string()
        }
        _ => first_message.unwrap_or_else(|| "Érvénytelen adatok".to_string()),
    };
    AppError::with_message(code, message).with_detail("fields", Value::Object(fields))
}

/// Replace the user's verification token and mail a fresh link.
/// Returns whether the mail went out; delivery failures are only logged.
async fn issue_verification(state: &AppState, user: &User) -> Result<bool, AppError> {
    let now = now_millis();
    let token = VerificationToken {
        user_id: user.id,
        token: Uuid::new_v4(),
        created_at: now,
        expires_at: now + TOKEN_TTL_HOURS * 60 * 60 * 1000,
        is_used: false,
    };
    state.store.replace_verification_token(&token).await?;

    let jwt = create_link_token(user.id, &user.username, token.token, &state.session_secret)
        .map_err(|e| {
            tracing::error!("Verification link signing failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    let link = format!("{}/auth/email-confirmation/{jwt}", state.frontend_url);

    match state
        .mailer
        .send_verification_email(&user.email, &user.full_name(), &link)
        .await
    {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::error!(user_id = user.id, error = %e, "Failed to send verification email");
            Ok(false)
        }
    }
}

fn start_session(state: &AppState, user_id: i64) -> Result<(String, String), AppError> {
    let token = create_token(user_id, &state.session_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    let cookie = session_cookie(token.clone(), state.secure_cookies).to_string();
    Ok((token, cookie))
}

// ── POST /auth/api/register ──

pub async fn register(
    State(state): State<AppState>,
    Json(mut req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    req.email = req.email.trim().to_lowercase();
    req.first_name = req.first_name.trim().to_string();
    req.last_name = req.last_name.trim().to_string();
    req.validate().map_err(|e| validation_error(&e))?;

    if state.store.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::EmailAlreadyRegistered,
            "Ezzel az e-mail címmel már regisztráltak",
        ));
    }

    let password_hash = hash_password(&req.password1).map_err(|e| {
        tracing::error!("Password hash error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let user = state
        .store
        .insert_user(&NewUser {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
            date_joined: now_millis(),
        })
        .await?;

    let email_sent = issue_verification(&state, &user).await?;
    tracing::info!(user_id = user.id, email_sent, "User registered");

    let message = if email_sent {
        "Sikeres regisztráció! A fiók aktiválásához kattints az e-mailben kapott linkre."
    } else {
        "Sikeres regisztráció, de a megerősítő e-mailt nem sikerült elküldeni."
    };
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": message,
            "email_sent": email_sent,
            "user": UserRepr::from(&user),
        })),
    )
        .into_response())
}

// ── GET /auth/email-confirmation/{token} ──

pub async fn confirm_email(
    State(state): State<AppState>,
    Path(link_token): Path<String>,
) -> Result<Response, AppError> {
    let invalid = || {
        AppError::with_message(
            ErrorCode::VerificationTokenInvalid,
            "Érvénytelen megerősítő link",
        )
    };
    let expired = || {
        AppError::with_message(
            ErrorCode::VerificationTokenExpired,
            "A megerősítő link lejárt, kérj újat",
        )
    };

    let (user_id, token) =
        verify_link_token(&link_token, &state.session_secret).map_err(|e| match e {
            VerificationError::Expired => expired(),
            VerificationError::Invalid => invalid(),
        })?;

    let stored = state
        .store
        .find_verification_token(token)
        .await?
        .filter(|t| t.user_id == user_id)
        .ok_or_else(invalid)?;
    if stored.is_used {
        return Err(AppError::with_message(
            ErrorCode::VerificationTokenInvalid,
            "A megerősítő linket már felhasználták",
        ));
    }
    let now = now_millis();
    if !stored.is_valid_at(now) {
        return Err(expired());
    }

    state.store.activate_user(user_id).await?;
    state.store.mark_verification_token_used(token).await?;
    state.store.record_login(user_id, now).await?;
    tracing::info!(user_id, "E-mail verified, account activated");

    let (_, cookie) = start_session(&state, user_id)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

// ── POST /auth/api/resend-verification ──

pub async fn resend_verification(
    State(state): State<AppState>,
    Json(req): Json<ResendRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();
    let generic = || {
        Json(json!({
            "success": true,
            "message": "Ha a fiók létezik és még nincs aktiválva, új megerősítő e-mailt küldtünk.",
        }))
    };

    // Same answer for unknown addresses to avoid account enumeration
    let Some(user) = state.store.find_user_by_email(&email).await? else {
        return Ok(generic());
    };
    if user.is_active {
        return Err(AppError::with_message(
            ErrorCode::AlreadyVerified,
            "A fiók már aktiválva van",
        ));
    }

    let email_sent = issue_verification(&state, &user).await?;
    tracing::info!(user_id = user.id, email_sent, "Verification e-mail re-issued");
    Ok(generic())
}

// ── POST /auth/api/login ──

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let email = req
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::required_field("email"))?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::required_field("password"))?;

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .filter(|u| verify_password(&password, &u.password_hash))
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::InvalidCredentials, "Hibás e-mail cím vagy jelszó")
        })?;

    if !user.is_active {
        return Err(AppError::with_message(
            ErrorCode::AccountNotActive,
            "Felhasználó fiókja nincs aktiválva",
        ));
    }

    state.store.record_login(user.id, now_millis()).await?;
    let (token, cookie) = start_session(&state, user.id)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "user": UserRepr::from(&user),
            "token": token,
        })),
    )
        .into_response())
}

// ── POST /auth/api/logout ──

pub async fn logout(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Response, AppError> {
    let user = user.ok_or_else(AppError::not_authenticated)?;
    tracing::info!(user_id = user.id, "User logged out");
    Ok((
        [(
            header::SET_COOKIE,
            clear_session_cookie(state.secure_cookies).to_string(),
        )],
        Json(json!({ "success": true })),
    )
        .into_response())
}

// ── GET /auth/api/user ──

pub async fn current_user(MaybeUser(user): MaybeUser) -> ApiResult<Value> {
    let user = user.ok_or_else(AppError::not_authenticated)?;
    Ok(Json(json!({ "success": true, "user": UserRepr::from(&user) })))
}
