//! In-memory [`Store`] for unit tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveTime;
use shared::models::{
    Buffet, Category, DEFAULT_BUFFET_NAME, OpeningHours, Order, OrderStatus, Product,
    ProductCreate, User,
};
use uuid::Uuid;

use super::{NewOrder, NewUser, Store, VerificationToken};
use crate::error::StoreError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    buffet: Option<Buffet>,
    admins: Vec<(i64, i64)>,
    hours: Vec<OpeningHours>,
    categories: Vec<Category>,
    products: Vec<Product>,
    orders: Vec<Order>,
    users: Vec<User>,
    tokens: Vec<VerificationToken>,
}

impl Inner {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_order_writes: AtomicBool,
    stale_email_lookups: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Make order inserts and updates fail with a database error
    pub fn fail_order_writes(&self, fail: bool) {
        self.fail_order_writes.store(fail, Ordering::SeqCst);
    }

    /// Make e-mail lookups miss, as a registration racing another one would
    pub fn stale_email_lookups(&self, stale: bool) {
        self.stale_email_lookups.store(stale, Ordering::SeqCst);
    }

    fn check_order_write(&self) -> Result<(), StoreError> {
        if self.fail_order_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub fn seed_user(&self, email: &str, active: bool) -> User {
        let mut inner = self.lock();
        let user = User {
            id: inner.id(),
            username: email.to_string(),
            email: email.to_string(),
            first_name: "Anna".to_string(),
            last_name: "Kiss".to_string(),
            password_hash: String::new(),
            is_active: active,
            date_joined: 0,
            last_login: None,
        };
        inner.users.push(user.clone());
        user
    }

    pub fn seed_category(&self, nev: &str) -> Category {
        let mut inner = self.lock();
        let category = Category {
            id: inner.id(),
            nev: nev.to_string(),
        };
        inner.categories.push(category.clone());
        category
    }

    pub fn seed_product(&self, kategoria_id: i64, nev: &str, ar: i64, max: i32) -> Product {
        let mut inner = self.lock();
        let product = Product {
            id: inner.id(),
            nev: nev.to_string(),
            kategoria_id,
            ar,
            max_rendelesenkent: max,
            hutve: false,
            elerheto: true,
            kisult: false,
        };
        inner.products.push(product.clone());
        product
    }

    pub fn delete_product(&self, id: i64) {
        self.lock().products.retain(|p| p.id != id);
    }

    pub fn token_for_user(&self, user_id: i64) -> Option<VerificationToken> {
        self.lock()
            .tokens
            .iter()
            .find(|t| t.user_id == user_id)
            .cloned()
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    /// Store an order as-is, bypassing validation
    pub fn seed_order(&self, user_id: i64, status: OrderStatus, leadva: i64) -> Order {
        let mut inner = self.lock();
        let order = Order {
            id: inner.id(),
            user_id,
            items: Vec::new(),
            allapot: status,
            leadva,
            idozitve: None,
            megjegyzes: String::new(),
            archived: false,
            vegosszeg: 0,
        };
        inner.orders.push(order.clone());
        order
    }

    fn update_order<F>(&self, id: i64, f: F) -> Result<Option<Order>, StoreError>
    where
        F: FnOnce(&mut Order) -> bool,
    {
        self.check_order_write()?;
        let mut inner = self.lock();
        let Some(order) = inner.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        Ok(f(order).then(|| order.clone()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_buffet(&self) -> Result<Option<Buffet>, StoreError> {
        Ok(self.lock().buffet.clone())
    }

    async fn get_or_create_buffet(&self) -> Result<Buffet, StoreError> {
        let mut inner = self.lock();
        if let Some(buffet) = &inner.buffet {
            return Ok(buffet.clone());
        }
        let buffet = Buffet {
            id: inner.id(),
            nev: DEFAULT_BUFFET_NAME.to_string(),
            rendkivuli_zarva: false,
        };
        for weekday in 0..7 {
            let id = inner.id();
            inner.hours.push(OpeningHours {
                id,
                buffet_id: buffet.id,
                weekday,
                from_hour: None,
                to_hour: None,
            });
        }
        inner.buffet = Some(buffet.clone());
        Ok(buffet)
    }

    async fn set_exceptionally_closed(
        &self,
        buffet_id: i64,
        closed: bool,
    ) -> Result<Option<Buffet>, StoreError> {
        let mut inner = self.lock();
        Ok(inner
            .buffet
            .as_mut()
            .filter(|b| b.id == buffet_id)
            .map(|b| {
                b.rendkivuli_zarva = closed;
                b.clone()
            }))
    }

    async fn list_opening_hours(&self, buffet_id: i64) -> Result<Vec<OpeningHours>, StoreError> {
        let mut hours: Vec<_> = self
            .lock()
            .hours
            .iter()
            .filter(|h| h.buffet_id == buffet_id)
            .cloned()
            .collect();
        hours.sort_by_key(|h| (h.weekday, h.from_hour, h.id));
        Ok(hours)
    }

    async fn update_opening_hours(
        &self,
        id: i64,
        from_hour: Option<NaiveTime>,
        to_hour: Option<NaiveTime>,
    ) -> Result<Option<OpeningHours>, StoreError> {
        let mut inner = self.lock();
        Ok(inner.hours.iter_mut().find(|h| h.id == id).map(|h| {
            h.from_hour = from_hour;
            h.to_hour = to_hour;
            h.clone()
        }))
    }

    async fn buffet_admin_ids(&self, buffet_id: i64) -> Result<Vec<i64>, StoreError> {
        Ok(self
            .lock()
            .admins
            .iter()
            .filter(|(b, _)| *b == buffet_id)
            .map(|(_, u)| *u)
            .collect())
    }

    async fn add_buffet_admin(&self, buffet_id: i64, user_id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if !inner.admins.contains(&(buffet_id, user_id)) {
            inner.admins.push((buffet_id, user_id));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.nev.cmp(&b.nev));
        Ok(categories)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.lock().products.clone())
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn insert_product(&self, p: &ProductCreate) -> Result<Product, StoreError> {
        let mut inner = self.lock();
        let product = Product {
            id: inner.id(),
            nev: p.nev.clone(),
            kategoria_id: p.kategoria_id,
            ar: p.ar,
            max_rendelesenkent: p.max_rendelesenkent,
            hutve: p.hutve,
            elerheto: p.elerheto,
            kisult: p.kisult,
        };
        inner.products.push(product.clone());
        Ok(product)
    }

    async fn save_product(&self, product: &Product) -> Result<Option<Product>, StoreError> {
        let mut inner = self.lock();
        Ok(inner
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .map(|p| {
                *p = product.clone();
                p.clone()
            }))
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        self.check_order_write()?;
        let mut inner = self.lock();
        let order = Order {
            id: inner.id(),
            user_id: order.user_id,
            items: order.items.clone(),
            allapot: OrderStatus::Placed,
            leadva: order.leadva,
            idozitve: order.idozitve,
            megjegyzes: order.megjegyzes.clone(),
            archived: false,
            vegosszeg: order.vegosszeg,
        };
        inner.orders.push(order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list_user_orders(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<_> = self
            .lock()
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| std::cmp::Reverse((o.leadva, o.id)));
        Ok(orders)
    }

    async fn list_active_orders(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<_> = self
            .lock()
            .orders
            .iter()
            .filter(|o| !o.archived)
            .cloned()
            .collect();
        orders.sort_by_key(|o| std::cmp::Reverse((o.leadva, o.id)));
        Ok(orders)
    }

    async fn cancel_placed_order(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Order>, StoreError> {
        self.update_order(id, |o| {
            if o.user_id != user_id || o.allapot != OrderStatus::Placed {
                return false;
            }
            o.allapot = OrderStatus::Cancelled;
            true
        })
    }

    async fn set_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        self.update_order(id, |o| {
            o.allapot = status;
            true
        })
    }

    async fn archive_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        self.update_order(id, |o| {
            o.archived = true;
            true
        })
    }

    async fn archive_done_orders(&self) -> Result<u64, StoreError> {
        self.check_order_write()?;
        let mut inner = self.lock();
        let mut count = 0;
        for order in inner
            .orders
            .iter_mut()
            .filter(|o| !o.archived && o.allapot.is_done())
        {
            order.archived = true;
            count += 1;
        }
        Ok(count)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        if self.stale_email_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::EmailTaken(user.email.clone()));
        }
        let user = User {
            id: inner.id(),
            username: user.email.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password_hash: user.password_hash.clone(),
            is_active: false,
            date_joined: user.date_joined,
            last_login: None,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn activate_user(&self, id: i64) -> Result<(), StoreError> {
        if let Some(u) = self.lock().users.iter_mut().find(|u| u.id == id) {
            u.is_active = true;
        }
        Ok(())
    }

    async fn record_login(&self, id: i64, now: i64) -> Result<(), StoreError> {
        if let Some(u) = self.lock().users.iter_mut().find(|u| u.id == id) {
            u.last_login = Some(now);
        }
        Ok(())
    }

    async fn replace_verification_token(
        &self,
        token: &VerificationToken,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.tokens.retain(|t| t.user_id != token.user_id);
        inner.tokens.push(VerificationToken {
            is_used: false,
            ..token.clone()
        });
        Ok(())
    }

    async fn find_verification_token(
        &self,
        token: Uuid,
    ) -> Result<Option<VerificationToken>, StoreError> {
        Ok(self.lock().tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn mark_verification_token_used(&self, token: Uuid) -> Result<(), StoreError> {
        if let Some(t) = self.lock().tokens.iter_mut().find(|t| t.token == token) {
            t.is_used = true;
        }
        Ok(())
    }
}
