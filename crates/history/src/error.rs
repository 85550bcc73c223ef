//! History error types.

use order_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("order store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
