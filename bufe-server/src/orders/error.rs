//! Order lifecycle errors

use shared::error::{AppError, ErrorCode};

use crate::error::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("A büfé jelenleg rendkívüli okból zárva tart.")]
    BuffetClosed,

    #[error("A kiválasztott termék nem található (#{0}).")]
    ProductNotFound(i64),

    #[error("{name} már nem elérhető.")]
    ProductUnavailable { product_id: i64, name: String },

    #[error("Legalább 1 darabot kell rendelni ebből: {name}.")]
    QuantityTooLow {
        product_id: i64,
        name: String,
        quantity: i32,
    },

    #[error("Maximum {max} darab rendelhető ebből a termékből: {name}.")]
    QuantityExceedsLimit {
        product_id: i64,
        name: String,
        quantity: i32,
        max: i32,
    },

    #[error("Az időzítésnek legalább 10 perccel a rendelés leadása után kell lennie.")]
    ScheduleTooSoon,

    #[error("Érvénytelen időpont: {0}")]
    InvalidSchedule(String),

    #[error("Ismeretlen szünet: {0}")]
    InvalidBreakSlot(String),

    #[error("A rendelés nem tartalmaz tételt.")]
    Empty,

    #[error("A rendelés végösszege túl nagy.")]
    TotalTooLarge,

    #[error("A rendelés nem található (#{0}).")]
    NotFound(i64),

    #[error("A rendelés már nem vonható vissza (#{0}).")]
    NotCancellable(i64),

    #[error("Érvénytelen állapot: {0}")]
    InvalidStatus(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        let message = e.to_string();
        match e {
            OrderError::BuffetClosed => AppError::with_message(ErrorCode::BuffetClosed, message),
            OrderError::ProductNotFound(id) => {
                AppError::with_message(ErrorCode::ProductNotFound, message)
                    .with_detail("product_id", id)
            }
            OrderError::ProductUnavailable { product_id, name } => {
                AppError::with_message(ErrorCode::ProductUnavailable, message)
                    .with_detail("product_id", product_id)
                    .with_detail("product", name)
            }
            OrderError::QuantityTooLow {
                product_id,
                name,
                quantity,
            } => AppError::with_message(ErrorCode::QuantityTooLow, message)
                .with_detail("product_id", product_id)
                .with_detail("product", name)
                .with_detail("quantity", quantity),
            OrderError::QuantityExceedsLimit {
                product_id,
                name,
                quantity,
                max,
            } => AppError::with_message(ErrorCode::QuantityExceedsLimit, message)
                .with_detail("product_id", product_id)
                .with_detail("product", name)
                .with_detail("quantity", quantity)
                .with_detail("max", max),
            OrderError::ScheduleTooSoon => {
                AppError::with_message(ErrorCode::ScheduleTooSoon, message)
            }
            OrderError::InvalidSchedule(value) => {
                AppError::with_message(ErrorCode::InvalidFormat, message)
                    .with_detail("field", "idozitve")
                    .with_detail("value", value)
            }
            OrderError::InvalidBreakSlot(value) => {
                AppError::with_message(ErrorCode::InvalidBreakSlot, message)
                    .with_detail("value", value)
            }
            OrderError::Empty => AppError::with_message(ErrorCode::OrderEmpty, message),
            OrderError::TotalTooLarge => {
                AppError::with_message(ErrorCode::OrderTotalTooLarge, message)
            }
            OrderError::NotFound(id) => AppError::with_message(ErrorCode::OrderNotFound, message)
                .with_detail("order_id", id),
            OrderError::NotCancellable(id) => {
                AppError::with_message(ErrorCode::OrderNotCancellable, message)
                    .with_detail("order_id", id)
            }
            OrderError::InvalidStatus(token) => {
                AppError::with_message(ErrorCode::InvalidOrderStatus, message)
                    .with_detail("status", token)
            }
            OrderError::Store(store_err) => store_err.into(),
        }
    }
}

impl axum::response::IntoResponse for OrderError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn quantity_error_names_product() {
        let err: AppError = OrderError::QuantityExceedsLimit {
            product_id: 3,
            name: "Kifli".into(),
            quantity: 5,
            max: 3,
        }
        .into();
        assert_eq!(err.code, ErrorCode::QuantityExceedsLimit);
        assert!(err.message.contains("Kifli"));
        assert!(err.message.contains('3'));
        let details = err.details.unwrap();
        assert_eq!(details.get("product_id").unwrap(), 3);
        assert_eq!(details.get("max").unwrap(), 3);
    }

    #[test]
    fn statuses() {
        let not_found: AppError = OrderError::NotFound(9).into();
        assert_eq!(not_found.http_status(), StatusCode::NOT_FOUND);

        let cancel: AppError = OrderError::NotCancellable(9).into();
        assert_eq!(cancel.http_status(), StatusCode::BAD_REQUEST);

        let status: AppError = OrderError::InvalidStatus("kesz".into()).into();
        assert_eq!(status.http_status(), StatusCode::BAD_REQUEST);

        let store: AppError = OrderError::Store(StoreError::Corrupt("x".into())).into();
        assert_eq!(store.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
