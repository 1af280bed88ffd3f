//! OrderService: validation, persistence and change notification
//!
//! Every mutating operation persists first and publishes after. A failed
//! write publishes nothing; a failed publish is logged and the write stands.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::dashboard::DashboardEvent;
use shared::models::{
    CreateOrderRequest, Order, OrderItem, OrderRepr, OrderStatus, OrderUserRepr, Product, User,
    compute_total,
};

use super::error::OrderError;
use super::schedule::resolve_schedule;
use crate::db::{NewOrder, Store};
use crate::live::{Broadcaster, publish_best_effort};

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { store, broadcaster }
    }

    /// Validate and place an order for `user`
    pub async fn create_order(
        &self,
        user: &User,
        req: &CreateOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<OrderRepr, OrderError> {
        if let Some(buffet) = self.store.get_buffet().await?
            && buffet.rendkivuli_zarva
        {
            return Err(OrderError::BuffetClosed);
        }

        let ids: Vec<i64> = req.items.iter().map(|line| line.product_id).collect();
        let products: HashMap<i64, Product> = self
            .store
            .products_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let items = validate_lines(req, &products)?;

        let idozitve = resolve_schedule(req.idozitve.as_deref(), req.szunet.as_deref(), now)?;

        if items.is_empty() {
            return Err(OrderError::Empty);
        }

        let vegosszeg = compute_total(&items, &products).ok_or(OrderError::TotalTooLarge)?;

        let new_order = NewOrder {
            user_id: user.id,
            vegosszeg,
            items,
            leadva: now.timestamp_millis(),
            idozitve: idozitve.map(|t| t.timestamp_millis()),
            megjegyzes: req
                .megjegyzes
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        };
        let order = self.store.insert_order(&new_order).await?;

        tracing::info!(
            order_id = order.id,
            user_id = user.id,
            total = order.vegosszeg,
            "Order placed"
        );

        let repr = OrderRepr::build(&order, OrderUserRepr::from(user), &products);
        publish_best_effort(&*self.broadcaster, DashboardEvent::OrderNew(repr.clone())).await;
        Ok(repr)
    }

    /// Owner cancels an order that is still `leadva`
    pub async fn cancel_order(&self, user: &User, order_id: i64) -> Result<OrderRepr, OrderError> {
        let Some(order) = self.store.cancel_placed_order(order_id, user.id).await? else {
            return match self.store.get_order(order_id).await? {
                Some(existing) if existing.user_id == user.id => {
                    Err(OrderError::NotCancellable(order_id))
                }
                _ => Err(OrderError::NotFound(order_id)),
            };
        };

        tracing::info!(order_id, user_id = user.id, "Order cancelled by owner");

        let repr = self.repr(&order).await?;
        publish_best_effort(&*self.broadcaster, DashboardEvent::OrderUpdate(repr.clone())).await;
        Ok(repr)
    }

    /// Admin status change. Any known status is accepted from any status.
    pub async fn set_status(&self, order_id: i64, token: &str) -> Result<OrderRepr, OrderError> {
        let status: OrderStatus = token
            .parse()
            .map_err(|_| OrderError::InvalidStatus(token.to_string()))?;

        let order = self
            .store
            .set_order_status(order_id, status)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        tracing::info!(order_id, status = status.as_str(), "Order status updated");

        let repr = self.repr(&order).await?;
        publish_best_effort(&*self.broadcaster, DashboardEvent::OrderUpdate(repr.clone())).await;
        Ok(repr)
    }

    pub async fn archive(&self, order_id: i64) -> Result<OrderRepr, OrderError> {
        let order = self
            .store
            .archive_order(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        tracing::info!(order_id, "Order archived");

        let repr = self.repr(&order).await?;
        publish_best_effort(&*self.broadcaster, DashboardEvent::OrderArchive(repr.clone())).await;
        Ok(repr)
    }

    /// Archive every finished order; returns how many were archived
    pub async fn archive_all_done(&self) -> Result<u64, OrderError> {
        let count = self.store.archive_done_orders().await?;
        tracing::info!(archived = count, "Finished orders archived");
        publish_best_effort(&*self.broadcaster, DashboardEvent::OrderArchiveAll).await;
        Ok(count)
    }

    /// Non-archived orders, newest first
    pub async fn list_active(&self) -> Result<Vec<OrderRepr>, OrderError> {
        let orders = self.store.list_active_orders().await?;
        self.reprs(&orders).await
    }

    /// The user's own orders, newest first
    pub async fn list_for_user(&self, user: &User) -> Result<Vec<OrderRepr>, OrderError> {
        let orders = self.store.list_user_orders(user.id).await?;
        self.reprs(&orders).await
    }

    /// Order detail for its owner or an admin; anyone else gets not found
    pub async fn get_for_viewer(
        &self,
        viewer: &User,
        order_id: i64,
        is_admin: bool,
    ) -> Result<OrderRepr, OrderError> {
        match self.store.get_order(order_id).await? {
            Some(order) if is_admin || order.user_id == viewer.id => self.repr(&order).await,
            _ => Err(OrderError::NotFound(order_id)),
        }
    }

    async fn repr(&self, order: &Order) -> Result<OrderRepr, OrderError> {
        let mut reprs = self.reprs(std::slice::from_ref(order)).await?;
        reprs.pop().ok_or(OrderError::NotFound(order.id))
    }

    /// Resolve products and users of a batch of orders in two lookups
    async fn reprs(&self, orders: &[Order]) -> Result<Vec<OrderRepr>, OrderError> {
        let product_ids: Vec<i64> = orders
            .iter()
            .flat_map(|o| o.items.iter().map(|i| i.termek_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let user_ids: Vec<i64> = orders
            .iter()
            .map(|o| o.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let products: HashMap<i64, Product> = self
            .store
            .products_by_ids(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let users: HashMap<i64, User> = self
            .store
            .users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(orders
            .iter()
            .map(|order| {
                let user = match users.get(&order.user_id) {
                    Some(u) => OrderUserRepr::from(u),
                    None => OrderUserRepr {
                        id: order.user_id,
                        username: String::new(),
                        full_name: String::new(),
                        email: String::new(),
                    },
                };
                OrderRepr::build(order, user, &products)
            })
            .collect())
    }
}

/// Check resolution, availability and quantities, one pass per rule.
///
/// The quantity cap applies to the summed quantity of a product, so
/// splitting it over several lines does not get around it.
fn validate_lines(
    req: &CreateOrderRequest,
    products: &HashMap<i64, Product>,
) -> Result<Vec<OrderItem>, OrderError> {
    let mut resolved = Vec::with_capacity(req.items.len());
    for line in &req.items {
        let product = products
            .get(&line.product_id)
            .ok_or(OrderError::ProductNotFound(line.product_id))?;
        resolved.push((line, product));
    }

    if let Some((_, p)) = resolved.iter().find(|(_, p)| !p.elerheto) {
        return Err(OrderError::ProductUnavailable {
            product_id: p.id,
            name: p.nev.clone(),
        });
    }

    let mut totals: HashMap<i64, i32> = HashMap::new();
    for (line, product) in &resolved {
        if line.quantity < 1 {
            return Err(OrderError::QuantityTooLow {
                product_id: product.id,
                name: product.nev.clone(),
                quantity: line.quantity,
            });
        }
        let total = totals.entry(product.id).or_default();
        *total = total.saturating_add(line.quantity);
        if *total > product.max_rendelesenkent {
            return Err(OrderError::QuantityExceedsLimit {
                product_id: product.id,
                name: product.nev.clone(),
                quantity: *total,
                max: product.max_rendelesenkent,
            });
        }
    }

    Ok(resolved
        .into_iter()
        .map(|(line, product)| OrderItem {
            termek_id: product.id,
            db: line.quantity,
        })
        .collect())
}
