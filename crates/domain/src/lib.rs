//! Domain layer for the marketplace checkout core.
//!
//! This crate provides:
//! - Cart aggregate with stable per-line identifiers
//! - Shipping form validation
//! - CheckoutService, the submitter that turns a cart into a durable order
//! - BuyerSession, the client-side session with optimistic order history

pub mod cart;
pub mod checkout;
pub mod error;
pub mod session;
pub mod shipping;

pub use cart::{Cart, CartLine, LineId};
pub use checkout::{CheckoutService, PlacedOrder};
pub use error::{CheckoutError, ValidationError};
pub use session::BuyerSession;
pub use shipping::{ShippingField, ShippingInfo};
