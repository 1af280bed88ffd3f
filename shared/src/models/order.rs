//! Order model and its client representation

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::user::User;
use crate::util::format_millis;

/// Shown in place of a product that no longer exists
pub const DELETED_PRODUCT_NAME: &str = "Törölt termék";

/// Order status
///
/// ```text
/// leadva ──► visszavonva      (owner cancel)
///   │
///   ├──────► torolve          (admin reject)
///   └──────► visszaigasolva ──► atadva
/// ```
///
/// Admin status changes are not restricted to these edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "leadva")]
    Placed,
    #[serde(rename = "visszavonva")]
    Cancelled,
    #[serde(rename = "visszaigasolva")]
    Confirmed,
    #[serde(rename = "torolve")]
    Rejected,
    #[serde(rename = "atadva")]
    HandedOver,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Cancelled,
        OrderStatus::Confirmed,
        OrderStatus::Rejected,
        OrderStatus::HandedOver,
    ];

    /// Statuses swept by archive-all-done
    pub const DONE: [OrderStatus; 3] = [
        OrderStatus::HandedOver,
        OrderStatus::Rejected,
        OrderStatus::Cancelled,
    ];

    /// Wire and storage token
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "leadva",
            OrderStatus::Cancelled => "visszavonva",
            OrderStatus::Confirmed => "visszaigasolva",
            OrderStatus::Rejected => "torolve",
            OrderStatus::HandedOver => "atadva",
        }
    }

    /// Hungarian display label
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Rendelés leadva",
            OrderStatus::Cancelled => "Rendelés visszavonva",
            OrderStatus::Confirmed => "Rendelés visszaigazolva",
            OrderStatus::Rejected => "Rendelés törölve",
            OrderStatus::HandedOver => "Rendelés átadva",
        }
    }

    pub const fn is_done(&self) -> bool {
        matches!(
            self,
            OrderStatus::HandedOver | OrderStatus::Rejected | OrderStatus::Cancelled
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One captured line of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub termek_id: i64,
    pub db: i32,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<OrderItem>,
    pub allapot: OrderStatus,
    /// Placed-at (millis), immutable
    pub leadva: i64,
    /// Scheduled pickup (millis)
    pub idozitve: Option<i64>,
    pub megjegyzes: String,
    pub archived: bool,
    /// Total in Ft, fixed at creation
    pub vegosszeg: i64,
}

/// Sum of price × quantity; unresolvable items contribute 0
///
/// `None` when the sum does not fit in an `i64`.
pub fn compute_total(items: &[OrderItem], products: &HashMap<i64, Product>) -> Option<i64> {
    items.iter().try_fold(0i64, |total, item| {
        let line = match products.get(&item.termek_id) {
            Some(p) => p.ar.checked_mul(i64::from(item.db))?,
            None => 0,
        };
        total.checked_add(line)
    })
}

/// One requested line of a new order
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderLineInput {
    #[serde(alias = "termek_id")]
    pub product_id: i64,
    #[serde(alias = "mennyiseg")]
    pub quantity: i32,
}

/// Create order request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLineInput>,
    /// Explicit pickup time (RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]`, UTC)
    #[serde(default)]
    pub idozitve: Option<String>,
    /// Break slot `HH:MM`, takes precedence over `idozitve`
    #[serde(default, alias = "szunet_valasztas")]
    pub szunet: Option<String>,
    #[serde(default)]
    pub megjegyzes: Option<String>,
}

/// Orderer as shown on an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUserRepr {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for OrderUserRepr {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            full_name: u.full_name(),
            email: u.email.clone(),
        }
    }
}

/// Order line resolved against the current catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRepr {
    pub termek_id: i64,
    pub termek_nev: String,
    pub termek_ar: i64,
    pub mennyiseg: i32,
    pub osszeg: i64,
}

/// Order as sent to clients and broadcast to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRepr {
    pub id: i64,
    pub user: OrderUserRepr,
    pub items: Vec<OrderItemRepr>,
    pub allapot: OrderStatus,
    pub allapot_display: String,
    pub leadva: String,
    pub idozitve: Option<String>,
    pub megjegyzes: String,
    pub vegosszeg: i64,
    pub archived: bool,
}

impl OrderRepr {
    /// Resolve items for display. The stored total is kept as is.
    pub fn build(order: &Order, user: OrderUserRepr, products: &HashMap<i64, Product>) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| match products.get(&item.termek_id) {
                Some(p) => OrderItemRepr {
                    termek_id: item.termek_id,
                    termek_nev: p.nev.clone(),
                    termek_ar: p.ar,
                    mennyiseg: item.db,
                    osszeg: p.ar.saturating_mul(i64::from(item.db)),
                },
                None => OrderItemRepr {
                    termek_id: item.termek_id,
                    termek_nev: DELETED_PRODUCT_NAME.to_string(),
                    termek_ar: 0,
                    mennyiseg: item.db,
                    osszeg: 0,
                },
            })
            .collect();

        Self {
            id: order.id,
            user,
            items,
            allapot: order.allapot,
            allapot_display: order.allapot.label().to_string(),
            leadva: format_millis(order.leadva),
            idozitve: order.idozitve.map(format_millis),
            megjegyzes: order.megjegyzes.clone(),
            vegosszeg: order.vegosszeg,
            archived: order.archived,
        }
    }
}
