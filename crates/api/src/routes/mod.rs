//! Route handlers.

pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;

use axum::http::HeaderMap;
use common::BuyerId;
use domain::CheckoutService;
use history::OrderHistoryReader;
use order_store::OrderStore;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub checkout: CheckoutService<S>,
    pub history: OrderHistoryReader<S>,
    pub store: S,
}

/// Header carrying the signed-in buyer's id.
pub const BUYER_HEADER: &str = "x-buyer-id";

/// Reads the buyer identity from `x-buyer-id`. A missing header is an
/// authentication failure; a present but malformed one is a bad request.
pub(crate) fn buyer_from_headers(headers: &HeaderMap) -> Result<BuyerId, ApiError> {
    let value = headers.get(BUYER_HEADER).ok_or(ApiError::Unauthenticated)?;
    let raw = value
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("{BUYER_HEADER} is not valid UTF-8")))?;
    let uuid = uuid::Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("invalid {BUYER_HEADER}: {e}")))?;
    Ok(BuyerId::from_uuid(uuid))
}
