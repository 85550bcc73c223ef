//! Domain error types.

use common::ProductId;
use order_store::StoreError;
use thiserror::Error;

use crate::shipping::ShippingField;

/// Pre-submission failures. These are caught before the store is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("missing required shipping field: {0}")]
    MissingField(ShippingField),

    #[error("a checkout submission is already in flight")]
    SubmissionInFlight,
}

/// Everything that can go wrong between "buy" and a confirmed order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("no signed-in buyer")]
    Unauthenticated,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("insufficient stock for product {product_id}")]
    StockShortage { product_id: ProductId },

    #[error("order persistence failed: {0}")]
    Persistence(String),
}

impl From<StoreError> for CheckoutError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StockShortage { product_id, .. } => {
                CheckoutError::StockShortage { product_id }
            }
            other => CheckoutError::Persistence(other.to_string()),
        }
    }
}
