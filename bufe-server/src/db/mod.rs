//! Database access layer
//!
//! Table modules hold the SQL as free functions over `&PgPool`. The
//! [`Store`] trait is the seam the services and handlers depend on;
//! [`PgStore`] implements it on top of those functions.

pub mod buffet;
pub mod catalog;
pub mod orders;
pub mod pg;
pub mod users;
pub mod verification_tokens;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveTime;
use shared::models::{
    Buffet, Category, OpeningHours, Order, OrderItem, OrderStatus, Product, ProductCreate, User,
};
use uuid::Uuid;

use crate::error::StoreError;

pub use pg::PgStore;

/// Order to be inserted; status is always `leadva`
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub items: Vec<OrderItem>,
    pub leadva: i64,
    pub idozitve: Option<i64>,
    pub megjegyzes: String,
    pub vegosszeg: i64,
}

/// User to be inserted (inactive until verified)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub date_joined: i64,
}

/// E-mail verification token, one per user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct VerificationToken {
    pub user_id: i64,
    pub token: Uuid,
    pub created_at: i64,
    pub expires_at: i64,
    pub is_used: bool,
}

impl VerificationToken {
    pub fn is_valid_at(&self, now: i64) -> bool {
        !self.is_used && now < self.expires_at
    }
}

/// Persistence operations used by the services and handlers
#[async_trait]
pub trait Store: Send + Sync {
    // ── Buffet ──

    async fn get_buffet(&self) -> Result<Option<Buffet>, StoreError>;

    /// Return the buffet row, creating it (with seven closed opening-hours
    /// rows, one per weekday) when none exists
    async fn get_or_create_buffet(&self) -> Result<Buffet, StoreError>;

    async fn set_exceptionally_closed(
        &self,
        buffet_id: i64,
        closed: bool,
    ) -> Result<Option<Buffet>, StoreError>;

    /// Ordered by weekday, then from_hour
    async fn list_opening_hours(&self, buffet_id: i64) -> Result<Vec<OpeningHours>, StoreError>;

    async fn update_opening_hours(
        &self,
        id: i64,
        from_hour: Option<NaiveTime>,
        to_hour: Option<NaiveTime>,
    ) -> Result<Option<OpeningHours>, StoreError>;

    async fn buffet_admin_ids(&self, buffet_id: i64) -> Result<Vec<i64>, StoreError>;

    async fn add_buffet_admin(&self, buffet_id: i64, user_id: i64) -> Result<(), StoreError>;

    // ── Catalog ──

    /// Alphabetical
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn get_category(&self, id: i64) -> Result<Option<Category>, StoreError>;

    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Products that still exist among `ids`
    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, StoreError>;

    async fn insert_product(&self, product: &ProductCreate) -> Result<Product, StoreError>;

    /// Overwrite every column of an existing product; `None` if it is gone
    async fn save_product(&self, product: &Product) -> Result<Option<Product>, StoreError>;

    // ── Orders ──

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError>;

    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError>;

    /// Newest first
    async fn list_user_orders(&self, user_id: i64) -> Result<Vec<Order>, StoreError>;

    /// Non-archived orders, newest first
    async fn list_active_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Move the order to `visszavonva` only if it belongs to `user_id` and
    /// is still `leadva`; `None` when the condition does not hold
    async fn cancel_placed_order(&self, id: i64, user_id: i64)
    -> Result<Option<Order>, StoreError>;

    async fn set_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError>;

    async fn archive_order(&self, id: i64) -> Result<Option<Order>, StoreError>;

    /// Archive every non-archived order in a done status; returns the count
    async fn archive_done_orders(&self) -> Result<u64, StoreError>;

    // ── Users ──

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Case-insensitive lookup
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError>;

    async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError>;

    async fn activate_user(&self, id: i64) -> Result<(), StoreError>;

    async fn record_login(&self, id: i64, now: i64) -> Result<(), StoreError>;

    // ── Verification tokens ──

    /// Store `token`, deleting any earlier token of the same user
    async fn replace_verification_token(&self, token: &VerificationToken)
    -> Result<(), StoreError>;

    async fn find_verification_token(
        &self,
        token: Uuid,
    ) -> Result<Option<VerificationToken>, StoreError>;

    async fn mark_verification_token_used(&self, token: Uuid) -> Result<(), StoreError>;
}
