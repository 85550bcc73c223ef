//! Shared types for the marketplace backend.
//!
//! Newtype identifiers keep order, buyer, and product ids from being mixed
//! up, and [`Money`] carries whole-rupiah amounts as integers.

mod types;

pub use types::{BuyerId, Money, OrderId, ProductId};
