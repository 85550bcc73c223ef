//! Storage boundary for the marketplace backend.
//!
//! Exposes the [`OrderStore`] trait — the narrow gateway the checkout flow
//! talks to — along with a PostgreSQL implementation whose `submit_order`
//! is a single all-or-nothing transaction, and an in-memory implementation
//! with the same contract for tests.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod records;
pub mod store;

pub use common::{BuyerId, Money, OrderId, ProductId};
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use records::{
    NewOrderLine, NewProduct, OrderLineRecord, OrderReceipt, OrderRecord, OrderStatus,
    OrderSubmission, ProductRecord,
};
pub use store::{OrderStore, validate_submission};
