//! PostgreSQL-backed [`Store`]

use async_trait::async_trait;
use chrono::NaiveTime;
use shared::models::{
    Buffet, Category, OpeningHours, Order, OrderStatus, Product, ProductCreate, User,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::{NewOrder, NewUser, Store, VerificationToken};
use super::{buffet, catalog, orders, users, verification_tokens};
use crate::error::StoreError;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_buffet(&self) -> Result<Option<Buffet>, StoreError> {
        Ok(buffet::get(&self.pool).await?)
    }

    async fn get_or_create_buffet(&self) -> Result<Buffet, StoreError> {
        Ok(buffet::get_or_create(&self.pool).await?)
    }

    async fn set_exceptionally_closed(
        &self,
        buffet_id: i64,
        closed: bool,
    ) -> Result<Option<Buffet>, StoreError> {
        Ok(buffet::set_exceptionally_closed(&self.pool, buffet_id, closed).await?)
    }

    async fn list_opening_hours(&self, buffet_id: i64) -> Result<Vec<OpeningHours>, StoreError> {
        Ok(buffet::list_opening_hours(&self.pool, buffet_id).await?)
    }

    async fn update_opening_hours(
        &self,
        id: i64,
        from_hour: Option<NaiveTime>,
        to_hour: Option<NaiveTime>,
    ) -> Result<Option<OpeningHours>, StoreError> {
        Ok(buffet::update_opening_hours(&self.pool, id, from_hour, to_hour).await?)
    }

    async fn buffet_admin_ids(&self, buffet_id: i64) -> Result<Vec<i64>, StoreError> {
        Ok(buffet::admin_ids(&self.pool, buffet_id).await?)
    }

    async fn add_buffet_admin(&self, buffet_id: i64, user_id: i64) -> Result<(), StoreError> {
        Ok(buffet::add_admin(&self.pool, buffet_id, user_id).await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(catalog::list_categories(&self.pool).await?)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(catalog::get_category(&self.pool, id).await?)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(catalog::list_products(&self.pool).await?)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(catalog::get_product(&self.pool, id).await?)
    }

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, StoreError> {
        Ok(catalog::products_by_ids(&self.pool, ids).await?)
    }

    async fn insert_product(&self, product: &ProductCreate) -> Result<Product, StoreError> {
        Ok(catalog::insert_product(&self.pool, product).await?)
    }

    async fn save_product(&self, product: &Product) -> Result<Option<Product>, StoreError> {
        Ok(catalog::save_product(&self.pool, product).await?)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        orders::insert(&self.pool, order).await
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        orders::get(&self.pool, id).await
    }

    async fn list_user_orders(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        orders::list_for_user(&self.pool, user_id).await
    }

    async fn list_active_orders(&self) -> Result<Vec<Order>, StoreError> {
        orders::list_active(&self.pool).await
    }

    async fn cancel_placed_order(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Order>, StoreError> {
        orders::cancel_placed(&self.pool, id, user_id).await
    }

    async fn set_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        orders::set_status(&self.pool, id, status).await
    }

    async fn archive_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        orders::archive(&self.pool, id).await
    }

    async fn archive_done_orders(&self) -> Result<u64, StoreError> {
        orders::archive_done(&self.pool).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(users::get(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(users::find_by_email(&self.pool, email).await?)
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        Ok(users::by_ids(&self.pool, ids).await?)
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        users::insert(&self.pool, user).await
    }

    async fn activate_user(&self, id: i64) -> Result<(), StoreError> {
        Ok(users::activate(&self.pool, id).await?)
    }

    async fn record_login(&self, id: i64, now: i64) -> Result<(), StoreError> {
        Ok(users::record_login(&self.pool, id, now).await?)
    }

    async fn replace_verification_token(
        &self,
        token: &VerificationToken,
    ) -> Result<(), StoreError> {
        Ok(verification_tokens::replace(&self.pool, token).await?)
    }

    async fn find_verification_token(
        &self,
        token: Uuid,
    ) -> Result<Option<VerificationToken>, StoreError> {
        Ok(verification_tokens::find(&self.pool, token).await?)
    }

    async fn mark_verification_token_used(&self, token: Uuid) -> Result<(), StoreError> {
        Ok(verification_tokens::mark_used(&self.pool, token).await?)
    }
}
