//! Buyer session: the client-side state a storefront holds between requests.
//!
//! The session owns the cart, the signed-in buyer, and an optimistic copy of
//! the order history. A confirmed checkout prepends the reconstructed order
//! locally instead of re-reading from the store; `refresh_history` replaces
//! the optimistic copy with the durable one.

use common::BuyerId;
use order_store::{OrderReceipt, OrderRecord, OrderStore};

use crate::cart::Cart;
use crate::checkout::CheckoutService;
use crate::error::{CheckoutError, ValidationError};
use crate::shipping::ShippingInfo;

#[derive(Debug, Clone, Default)]
pub struct BuyerSession {
    buyer: Option<BuyerId>,
    cart: Cart,
    history: Vec<OrderRecord>,
    submitting: bool,
}

impl BuyerSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(buyer: BuyerId) -> Self {
        Self {
            buyer: Some(buyer),
            ..Self::default()
        }
    }

    pub fn sign_in(&mut self, buyer: BuyerId) {
        self.buyer = Some(buyer);
    }

    /// Signs out but keeps the cart, so a browsing visitor does not lose
    /// their selection by authenticating later.
    pub fn sign_out(&mut self) {
        self.buyer = None;
        self.history.clear();
    }

    pub fn buyer(&self) -> Option<BuyerId> {
        self.buyer
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Orders newest-first. Optimistic until the next `refresh_history`.
    pub fn history(&self) -> &[OrderRecord] {
        &self.history
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submits the session cart. At most one submission may be in flight per
    /// session; if a previous `checkout` future was dropped mid-submission,
    /// the flag stays set and later calls are rejected without touching the
    /// store, since the dropped submission may still land server-side.
    ///
    /// On success the cart is cleared and the new order lands at the front of
    /// the local history. On failure both are left untouched.
    pub async fn checkout<S: OrderStore>(
        &mut self,
        service: &CheckoutService<S>,
        shipping: &ShippingInfo,
    ) -> Result<OrderReceipt, CheckoutError> {
        if self.submitting {
            return Err(ValidationError::SubmissionInFlight.into());
        }
        self.submitting = true;
        let result = service.place_order(self.buyer, &self.cart, shipping).await;
        self.submitting = false;

        let placed = result?;
        let receipt = OrderReceipt {
            order_id: placed.order.id,
            status: placed.order.status,
        };
        self.history.insert(0, placed.order);
        self.cart.clear();
        Ok(receipt)
    }

    /// Replaces the optimistic history with the store's durable view.
    pub async fn refresh_history<S: OrderStore>(&mut self, store: &S) -> Result<(), CheckoutError> {
        let buyer = self.buyer.ok_or(CheckoutError::Unauthenticated)?;
        self.history = store.orders_for_buyer(buyer).await?;
        Ok(())
    }
}
