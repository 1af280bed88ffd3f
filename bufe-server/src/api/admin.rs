//! Buffet administration endpoints (all require a buffet admin)

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::AppError;
use shared::models::{BuffetUpdate, OpeningHoursUpdate, ProductCreate, ProductUpdate};
use shared::util::format_hhmm;

use super::ApiResult;
use crate::auth::AdminUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub order_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveOrderRequest {
    pub order_id: Option<i64>,
}

/// GET /bufe/admin/api/orders
pub async fn list_orders(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Value> {
    let orders = state.orders.list_active().await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// POST /bufe/admin/api/update-order
pub async fn update_order(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<UpdateOrderRequest>,
) -> ApiResult<Value> {
    let order_id = req
        .order_id
        .ok_or_else(|| AppError::required_field("order_id"))?;
    let status = req
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::required_field("status"))?;

    let order = state.orders.set_status(order_id, status).await?;
    tracing::info!(admin_id = admin.id, order_id, status, "Admin changed order status");
    Ok(Json(json!({ "success": true, "order": order })))
}

/// POST /bufe/admin/api/archive-order
pub async fn archive_order(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<ArchiveOrderRequest>,
) -> ApiResult<Value> {
    let order_id = req
        .order_id
        .ok_or_else(|| AppError::required_field("order_id"))?;
    state.orders.archive(order_id).await?;
    Ok(Json(json!({ "success": true, "order_id": order_id })))
}

/// POST /bufe/admin/api/archive-all-done
pub async fn archive_all_done(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Value> {
    let archived_count = state.orders.archive_all_done().await?;
    Ok(Json(json!({ "success": true, "archived_count": archived_count })))
}

/// POST /bufe/admin/api/update-product
pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(update): Json<ProductUpdate>,
) -> ApiResult<Value> {
    let product = state.catalog.update_product(&update).await?;
    Ok(Json(json!({ "success": true, "product": product })))
}

/// POST /bufe/admin/api/create-product
pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<ProductCreate>,
) -> ApiResult<Value> {
    let product = state.catalog.create_product(&input).await?;
    Ok(Json(json!({ "success": true, "product": product })))
}

/// POST /bufe/admin/api/update-opening-hours
pub async fn update_opening_hours(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(update): Json<OpeningHoursUpdate>,
) -> ApiResult<Value> {
    let hours = state.catalog.update_opening_hours(&update).await?;
    Ok(Json(json!({
        "success": true,
        "opening_hours": {
            "id": hours.id,
            "weekday": hours.weekday,
            "from_hour": hours.from_hour.map(format_hhmm),
            "to_hour": hours.to_hour.map(format_hhmm),
        }
    })))
}

/// POST /bufe/admin/api/update-bufe
pub async fn update_buffet(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(update): Json<BuffetUpdate>,
) -> ApiResult<Value> {
    let buffet = state
        .catalog
        .set_exceptionally_closed(update.rendkivuli_zarva)
        .await?;
    Ok(Json(json!({
        "success": true,
        "rendkivuli_zarva": buffet.rendkivuli_zarva,
    })))
}
