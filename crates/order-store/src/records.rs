//! Record types exchanged with the order store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{BuyerId, Money, OrderId, ProductId};

/// A catalog product as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Catalog row id.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price in whole rupiah.
    pub price: Money,

    /// Available-to-sell count, decremented at order creation.
    pub stock: u32,

    /// Seller display name.
    pub seller: String,

    /// Optional listing image.
    pub image_url: Option<String>,

    /// Inactive products are hidden from the catalog and cannot be ordered.
    pub active: bool,
}

/// Fields for creating a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub stock: u32,
    pub seller: String,
    pub image_url: Option<String>,
}

/// Lifecycle status of a persisted order.
///
/// Transitions past `Pending` are driven by external fulfillment, not by
/// this backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created by checkout, awaiting payment.
    #[default]
    Pending,

    /// Payment received.
    Paid,

    /// Fulfilled (terminal).
    Completed,
}

impl OrderStatus {
    /// Returns the status as its stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Completed => "completed",
        }
    }

    /// Parses the stored string form.
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "paid" => Some(OrderStatus::Paid),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of an order submission, as known client-side at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    /// The product being purchased.
    pub product_id: ProductId,

    /// Quantity ordered, always at least 1.
    pub quantity: u32,

    /// Unit price at the time of purchase.
    pub unit_price: Money,

    /// Product name snapshot.
    pub product_name: String,
}

impl NewOrderLine {
    /// Returns the total for this line (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A full checkout submission handed to the persistence procedure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub buyer: BuyerId,
    pub total: Money,
    pub shipping_address: String,
    pub shipping_phone: String,
    pub items: Vec<NewOrderLine>,
}

/// What the persistence procedure returns on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// A persisted order line, immutable after creation.
///
/// `image_url` is joined from the current product row for display; the
/// name and price are the purchase-time snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub image_url: Option<String>,
}

impl OrderLineRecord {
    /// Returns the total for this line (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A persisted order with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub buyer: BuyerId,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total: Money,
    pub shipping_address: String,
    pub shipping_phone: String,
    pub lines: Vec<OrderLineRecord>,
}

impl OrderRecord {
    /// Recomputes the total from the lines.
    ///
    /// Always equals `total` for a well-formed order.
    pub fn line_total(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }
}
