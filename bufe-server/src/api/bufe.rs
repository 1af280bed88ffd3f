//! Customer-facing buffet endpoints
//!
//! GET  /bufe/api/opening-hours     - public
//! GET  /bufe/api/menu              - gate
//! GET  /bufe/orders                - gate, own orders
//! POST /bufe/orders                - gate, place an order
//! GET  /bufe/orders/{id}           - owner or admin
//! POST /bufe/orders/{id}/cancel    - owner

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use shared::error::AppError;
use shared::models::{CreateOrderRequest, OpeningHoursResponse};

use super::ApiResult;
use crate::auth::{BuffetUser, Capability, GateContext, MaybeUser, check_access};
use crate::state::AppState;

pub async fn opening_hours(State(state): State<AppState>) -> ApiResult<OpeningHoursResponse> {
    let response = state.catalog.opening_hours(chrono::Utc::now()).await?;
    Ok(Json(response))
}

pub async fn menu(State(state): State<AppState>, _user: BuffetUser) -> ApiResult<Value> {
    let categories = state.catalog.menu().await?;
    Ok(Json(json!({ "success": true, "categories": categories })))
}

pub async fn my_orders(
    State(state): State<AppState>,
    BuffetUser(user): BuffetUser,
) -> ApiResult<Value> {
    let orders = state.orders.list_for_user(&user).await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// Places the order and redirects to its detail page
pub async fn create_order(
    State(state): State<AppState>,
    BuffetUser(user): BuffetUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Response, AppError> {
    let order = match state.orders.create_order(&user, &req, chrono::Utc::now()).await {
        Ok(order) => order,
        Err(e) => {
            tracing::info!(user_id = user.id, error = %e, "Order rejected");
            return Err(e.into());
        }
    };
    let location = format!("/bufe/orders/{}", order.id);
    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location)],
        Json(json!({ "success": true, "order": order })),
    )
        .into_response())
}

/// Owners pass the buffet gate; admins are let through on the admin gate
/// alone, whatever their e-mail domain.
pub async fn order_detail(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(order_id): Path<i64>,
) -> ApiResult<Value> {
    let admin_ids = match &user {
        Some(_) => state.admin_ids().await?,
        None => Vec::new(),
    };
    let ctx = GateContext {
        allowed_domains: &state.allowed_domains,
        admin_ids: &admin_ids,
    };
    let is_admin = check_access(user.as_ref(), Capability::BuffetAdmin, ctx).is_ok();
    if !is_admin {
        check_access(user.as_ref(), Capability::Buffet, ctx)
            .map_err(|reason| reason.into_app_error(user.as_ref()))?;
    }
    let user = user.ok_or_else(AppError::not_authenticated)?;

    let order = state
        .orders
        .get_for_viewer(&user, order_id, is_admin)
        .await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    BuffetUser(user): BuffetUser,
    Path(order_id): Path<i64>,
) -> Result<Response, AppError> {
    let order = state.orders.cancel_order(&user, order_id).await?;
    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, "/bufe/orders")],
        Json(json!({ "success": true, "order": order })),
    )
        .into_response())
}
