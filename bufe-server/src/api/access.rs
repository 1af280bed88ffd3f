//! GET /bufe/api/check-access

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shared::models::UserRepr;

use crate::auth::session::MaybeUser;
use crate::auth::{Capability, GateContext, check_access};
use crate::state::AppState;

/// Whether the caller may use the buffet, and why not
pub async fn check(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Response {
    let ctx = GateContext {
        allowed_domains: &state.allowed_domains,
        admin_ids: &[],
    };

    match check_access(user.as_ref(), Capability::Buffet, ctx) {
        Ok(()) => Json(json!({
            "has_access": true,
            "reason": "access_granted",
            "message": "Hozzáférés engedélyezve",
            "user": user.as_ref().map(UserRepr::from),
        }))
        .into_response(),
        Err(reason) => {
            let user_domain = user
                .as_ref()
                .and_then(|u| u.email_domain())
                .unwrap_or_default();
            tracing::debug!(
                user_id = user.as_ref().map(|u| u.id),
                reason = reason.as_str(),
                "Buffet access denied"
            );
            (
                reason.status(),
                Json(json!({
                    "has_access": false,
                    "reason": reason.as_str(),
                    "message": reason.message(&user_domain),
                    "user_domain": user_domain,
                    "allowed_domains": state.allowed_domains,
                })),
            )
                .into_response()
        }
    }
}
