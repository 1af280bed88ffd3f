//! Dashboard WebSocket protocol
//!
//! Server → Dashboard: DashboardMessage (pushes and replies)
//! Dashboard → Server: DashboardCommand

use serde::{Deserialize, Serialize};

use crate::models::{OrderRepr, ProductCreate, ProductRepr};

/// What happened to the object carried by an update message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    New,
    Update,
    Archive,
    ArchiveAll,
}

/// Server → Dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardMessage {
    /// Order created, changed or archived; `archive_all` carries no order
    OrderUpdate {
        action: UpdateAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<Box<OrderRepr>>,
    },

    /// Product created or changed
    ProductUpdate {
        action: UpdateAction,
        product: ProductRepr,
    },

    /// Reply to `ping`
    Pong,

    /// Reply to `add_product`
    AddProductResponse {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        product: Option<ProductRepr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// Malformed or failed command
    Error { message: String },

    /// Events were dropped for this connection; refetch the order list
    Resync,
}

/// Dashboard → Server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardCommand {
    Ping,
    AddProduct(ProductCreate),
}

/// Change notification published to the `bufe_orders` group
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    OrderNew(OrderRepr),
    OrderUpdate(OrderRepr),
    OrderArchive(OrderRepr),
    OrderArchiveAll,
    ProductNew(ProductRepr),
    ProductUpdate(ProductRepr),
}

impl DashboardEvent {
    /// Event kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardEvent::OrderNew(_) => "order_new",
            DashboardEvent::OrderUpdate(_) => "order_update",
            DashboardEvent::OrderArchive(_) => "order_archive",
            DashboardEvent::OrderArchiveAll => "order_archive_all",
            DashboardEvent::ProductNew(_) => "product_new",
            DashboardEvent::ProductUpdate(_) => "product_update",
        }
    }
}

impl From<DashboardEvent> for DashboardMessage {
    fn from(event: DashboardEvent) -> Self {
        let order = |action, order: OrderRepr| DashboardMessage::OrderUpdate {
            action,
            order: Some(Box::new(order)),
        };
        match event {
            DashboardEvent::OrderNew(o) => order(UpdateAction::New, o),
            DashboardEvent::OrderUpdate(o) => order(UpdateAction::Update, o),
            DashboardEvent::OrderArchive(o) => order(UpdateAction::Archive, o),
            DashboardEvent::OrderArchiveAll => DashboardMessage::OrderUpdate {
                action: UpdateAction::ArchiveAll,
                order: None,
            },
            DashboardEvent::ProductNew(product) => DashboardMessage::ProductUpdate {
                action: UpdateAction::New,
                product,
            },
            DashboardEvent::ProductUpdate(product) => DashboardMessage::ProductUpdate {
                action: UpdateAction::Update,
                product,
            },
        }
    }
}
