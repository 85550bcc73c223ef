//! Checkout submitter: turns a validated cart plus shipping form into a
//! durable order through the order store.

use chrono::Utc;
use common::BuyerId;
use order_store::{
    OrderLineRecord, OrderReceipt, OrderRecord, OrderStore, OrderSubmission,
};

use crate::cart::Cart;
use crate::error::{CheckoutError, ValidationError};
use crate::shipping::ShippingInfo;

/// Submits checkouts against an order store.
///
/// All-or-nothing: either the store confirms the whole order or nothing is
/// persisted and the caller's cart is untouched.
#[derive(Debug, Clone)]
pub struct CheckoutService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> CheckoutService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and submits the cart as one order.
    ///
    /// On success, returns the order reconstructed from the submitted data so
    /// the caller can show it immediately without a read-back.
    #[tracing::instrument(skip(self, cart, shipping))]
    pub async fn place_order(
        &self,
        buyer: Option<BuyerId>,
        cart: &Cart,
        shipping: &ShippingInfo,
    ) -> Result<PlacedOrder, CheckoutError> {
        let buyer = buyer.ok_or(CheckoutError::Unauthenticated)?;
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        shipping
            .validate()
            .map_err(|field| ValidationError::MissingField(field))?;

        let total = cart.total();
        let submission = OrderSubmission {
            buyer,
            total,
            shipping_address: shipping.address.clone(),
            shipping_phone: shipping.phone.clone(),
            items: cart.to_order_lines(),
        };

        let start = std::time::Instant::now();
        let receipt = match self.store.submit_order(submission).await {
            Ok(receipt) => receipt,
            Err(err) => {
                metrics::counter!("checkout_failed_total").increment(1);
                tracing::warn!(%buyer, error = %err, "checkout rejected by store");
                return Err(err.into());
            }
        };
        metrics::counter!("checkout_orders_placed_total").increment(1);
        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());
        tracing::info!(order_id = %receipt.order_id, %total, "checkout confirmed");

        Ok(PlacedOrder::reconstruct(receipt, buyer, cart, shipping))
    }
}

/// A confirmed checkout. The embedded record mirrors what was persisted,
/// built from the submission itself rather than a follow-up query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order: OrderRecord,
}

impl PlacedOrder {
    fn reconstruct(
        receipt: OrderReceipt,
        buyer: BuyerId,
        cart: &Cart,
        shipping: &ShippingInfo,
    ) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|l| OrderLineRecord {
                product_id: l.product_id,
                product_name: l.name.clone(),
                unit_price: l.unit_price,
                quantity: l.quantity,
                image_url: l.image_url.clone(),
            })
            .collect();
        Self {
            order: OrderRecord {
                id: receipt.order_id,
                buyer,
                created_at: Utc::now(),
                status: receipt.status,
                total: cart.total(),
                shipping_address: shipping.address.clone(),
                shipping_phone: shipping.phone.clone(),
                lines,
            },
        }
    }

    pub fn order_id(&self) -> common::OrderId {
        self.order.id
    }

    pub fn status(&self) -> order_store::OrderStatus {
        self.order.status
    }
}
