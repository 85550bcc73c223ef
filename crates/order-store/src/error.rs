use thiserror::Error;

use common::{Money, ProductId};

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A product lacks sufficient stock for the requested quantity.
    /// The whole submission is rolled back; no order is created.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    StockShortage {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The referenced product does not exist or is no longer active.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The declared order total does not match the sum of its lines.
    #[error("Order total mismatch: declared {declared}, computed {computed}")]
    TotalMismatch { declared: Money, computed: Money },

    /// The submission or a stored row violates the order invariants.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
