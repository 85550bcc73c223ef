//! Per-buyer order history endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use history::OrderView;
use order_store::OrderStore;

use super::{AppState, buyer_from_headers};
use crate::error::ApiError;

/// GET /orders — the requesting buyer's orders, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn history<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let buyer = buyer_from_headers(&headers)?;
    let orders = state.history.orders_for_buyer(buyer).await?;
    Ok(Json(orders))
}
