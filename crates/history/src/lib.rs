//! Order history read side.
//!
//! Wraps the order store's per-buyer query in display-ready views: localized
//! status labels, per-line totals, and listing images joined from the catalog.

pub mod error;
pub mod reader;
pub mod views;

pub use error::{HistoryError, Result};
pub use reader::OrderHistoryReader;
pub use views::{LineView, OrderView, status_label};
