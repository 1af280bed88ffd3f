//! API routes for bufe-server

pub mod access;
pub mod admin;
pub mod auth;
pub mod bufe;
pub mod dashboard_ws;
pub mod health;


use axum::http::HeaderName;
use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::error::AppError;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Login (rate limited)
    let login = Router::new()
        .route("/auth/api/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    // Registration and resend (rate limited)
    let registration = Router::new()
        .route("/auth/api/register", post(auth::register))
        .route(
            "/auth/api/resend-verification",
            post(auth::resend_verification),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let account = Router::new()
        .route("/auth/email-confirmation/{token}", get(auth::confirm_email))
        .route("/auth/api/logout", post(auth::logout))
        .route("/auth/api/user", get(auth::current_user));

    let buffet = Router::new()
        .route("/bufe/api/check-access", get(access::check))
        .route("/bufe/api/opening-hours", get(bufe::opening_hours))
        .route("/bufe/api/menu", get(bufe::menu))
        .route("/bufe/orders", get(bufe::my_orders).post(bufe::create_order))
        .route("/bufe/orders/{id}", get(bufe::order_detail))
        .route("/bufe/orders/{id}/cancel", post(bufe::cancel_order));

    let admin = Router::new()
        .route("/bufe/admin/api/orders", get(admin::list_orders))
        .route("/bufe/admin/api/update-order", post(admin::update_order))
        .route("/bufe/admin/api/archive-order", post(admin::archive_order))
        .route(
            "/bufe/admin/api/archive-all-done",
            post(admin::archive_all_done),
        )
        .route("/bufe/admin/api/update-product", post(admin::update_product))
        .route("/bufe/admin/api/create-product", post(admin::create_product))
        .route(
            "/bufe/admin/api/update-opening-hours",
            post(admin::update_opening_hours),
        )
        .route("/bufe/admin/api/update-bufe", post(admin::update_buffet))
        .route("/ws/bufe/orders", get(dashboard_ws::handle_dashboard_ws));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(login)
        .merge(registration)
        .merge(account)
        .merge(buffet)
        .merge(admin)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
