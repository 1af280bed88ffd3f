//! Data models
//!
//! Shared between the server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL).

pub mod buffet;
pub mod catalog;
pub mod order;
pub mod user;

// Re-exports
pub use buffet::*;
pub use catalog::*;
pub use order::*;
pub use user::*;
