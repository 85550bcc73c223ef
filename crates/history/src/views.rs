//! Display-ready order views.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId};
use order_store::{OrderLineRecord, OrderRecord, OrderStatus};
use serde::Serialize;

/// Storefront label for an order status, in Indonesian.
pub fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Menunggu",
        OrderStatus::Paid => "Dibayar",
        OrderStatus::Completed => "Selesai",
    }
}

/// One past purchase, shaped for display.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub total: Money,
    pub shipping_address: String,
    pub shipping_phone: String,
    pub lines: Vec<LineView>,
}

/// One line of a past purchase. Name and price are the purchase-time
/// snapshot; the image is whatever the catalog currently shows.
#[derive(Debug, Clone, Serialize)]
pub struct LineView {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
    pub image_url: Option<String>,
}

impl From<OrderLineRecord> for LineView {
    fn from(line: OrderLineRecord) -> Self {
        let line_total = line.line_total();
        let name = if line.product_name.trim().is_empty() {
            "Produk".to_string()
        } else {
            line.product_name
        };
        Self {
            product_id: line.product_id,
            name,
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total,
            image_url: line.image_url,
        }
    }
}

impl From<OrderRecord> for OrderView {
    fn from(order: OrderRecord) -> Self {
        Self {
            id: order.id,
            placed_at: order.created_at,
            status: order.status,
            status_label: status_label(order.status),
            total: order.total,
            shipping_address: order.shipping_address,
            shipping_phone: order.shipping_phone,
            lines: order.lines.into_iter().map(LineView::from).collect(),
        }
    }
}
