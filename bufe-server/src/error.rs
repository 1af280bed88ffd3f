//! Service-layer error types
//!
//! `StoreError` is what the persistence layer returns. `ServiceError` bridges
//! it and the API-layer error (`AppError`) so handlers can use `?` without
//! hand-written `map_err` + logging at every call site.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored row could not be decoded into its domain type
    #[error("corrupt row: {0}")]
    Corrupt(String),
    /// Unique e-mail constraint hit on insert
    #[error("e-mail already registered: {0}")]
    EmailTaken(String),
}

/// Service-layer error
///
/// - `Store`: persistence errors (auto-logged, mapped to DatabaseError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Store(e.into())
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        if let StoreError::EmailTaken(_) = e {
            return AppError::with_message(
                ErrorCode::EmailAlreadyRegistered,
                "Ezzel az e-mail címmel már regisztráltak",
            );
        }
        tracing::error!(error = %e, "Store error");
        AppError::new(ErrorCode::DatabaseError)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(store_err) => store_err.into(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
