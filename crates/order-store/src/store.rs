use async_trait::async_trait;

use common::{BuyerId, ProductId};

use crate::records::{NewProduct, OrderReceipt, OrderRecord, OrderSubmission, ProductRecord};
use crate::{Result, StoreError};

/// Gateway trait for order and catalog storage.
///
/// The checkout flow depends only on this trait, so it can run against
/// PostgreSQL in production and against [`crate::InMemoryOrderStore`] in
/// tests. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a checkout submission as one order with its lines.
    ///
    /// The operation is all-or-nothing: the order row, every line row, and
    /// every stock decrement happen together or not at all. If any line's
    /// product lacks sufficient stock, the call fails with
    /// [`StoreError::StockShortage`] naming the product, and nothing is
    /// written.
    async fn submit_order(&self, submission: OrderSubmission) -> Result<OrderReceipt>;

    /// Returns all orders for a buyer, newest first, with nested lines.
    async fn orders_for_buyer(&self, buyer: BuyerId) -> Result<Vec<OrderRecord>>;

    /// Looks up a single product. Returns None for unknown ids.
    async fn get_product(&self, id: ProductId) -> Result<Option<ProductRecord>>;

    /// Returns all active catalog products.
    async fn list_products(&self) -> Result<Vec<ProductRecord>>;

    /// Creates a catalog product, assigning its id.
    async fn insert_product(&self, product: NewProduct) -> Result<ProductRecord>;
}

/// Validates a submission before it touches storage.
///
/// Enforced by every backend: an order is never created with zero lines,
/// line quantities are at least 1, and the declared total equals the sum
/// of the lines.
pub fn validate_submission(submission: &OrderSubmission) -> Result<()> {
    if submission.items.is_empty() {
        return Err(StoreError::InvalidOrder(
            "submission has no items".to_string(),
        ));
    }

    for item in &submission.items {
        if item.quantity == 0 {
            return Err(StoreError::InvalidOrder(format!(
                "line for product {} has zero quantity",
                item.product_id
            )));
        }
    }

    let computed = submission.items.iter().map(|i| i.line_total()).sum();
    if submission.total != computed {
        return Err(StoreError::TotalMismatch {
            declared: submission.total,
            computed,
        });
    }

    Ok(())
}
