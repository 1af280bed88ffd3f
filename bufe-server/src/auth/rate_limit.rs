//! Per-IP throttling of the credential endpoints
//!
//! Each [`Scope`] has its own fixed window. A blocked request gets 429 with
//! `retry_after_secs` in the error details.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::AppError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

/// Entries idle for longer than this are dropped by [`RateLimiter::cleanup`]
const IDLE_EVICTION: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `POST /auth/api/login`
    Login,
    /// `POST /auth/api/register` and `/auth/api/resend-verification`
    Registration,
}

impl Scope {
    fn max_requests(self) -> u32 {
        match self {
            Scope::Login => 5,
            Scope::Registration => 3,
        }
    }

    fn window(self) -> Duration {
        Duration::from_secs(60)
    }
}

struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<(Scope, String), Window>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one hit; `Err` carries the time left in the current window.
    async fn hit(&self, scope: Scope, ip: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let window = windows
            .entry((scope, ip.to_owned()))
            .or_insert(Window { started: now, hits: 0 });

        let elapsed = now.duration_since(window.started);
        if elapsed >= scope.window() {
            window.started = now;
            window.hits = 0;
        }

        window.hits += 1;
        if window.hits > scope.max_requests() {
            return Err(scope.window().saturating_sub(now.duration_since(window.started)));
        }
        Ok(())
    }

    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) < IDLE_EVICTION);
        let evicted = before - windows.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Rate limiter entries evicted");
        }
    }
}

/// Client address: the left-most `X-Forwarded-For` hop, else the socket peer
fn client_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match forwarded {
        Some(ip) => ip.to_owned(),
        None => request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_owned()),
    }
}

async fn throttle(state: &AppState, scope: Scope, request: Request, next: Next) -> Response {
    let ip = client_ip(&request);
    match state.rate_limiter.hit(scope, &ip).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            tracing::warn!(ip = %ip, scope = ?scope, "Rate limit hit");
            AppError::too_many_requests()
                .with_detail("retry_after_secs", retry_after.as_secs().max(1))
                .into_response()
        }
    }
}

pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    throttle(&state, Scope::Login, request, next).await
}

pub async fn register_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    throttle(&state, Scope::Registration, request, next).await
}
