//! Checkout submission endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use common::{Money, ProductId};
use domain::{Cart, ShippingInfo};
use history::status_label;
use order_store::OrderStore;
use serde::{Deserialize, Serialize};

use super::{AppState, buyer_from_headers};
use crate::error::ApiError;

// -- Request types --

/// The client's cart as it stands at submission time.
#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItemRequest>,
    pub shipping: ShippingRequest,
}

#[derive(Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: i64,
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct ShippingRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub status: String,
    pub status_label: &'static str,
    pub total: i64,
}

// -- Handlers --

/// POST /checkout — submit the cart as one order.
#[tracing::instrument(skip(state, headers, req))]
pub async fn submit<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<CheckoutRequest>,
) -> Result<(axum::http::StatusCode, Json<CheckoutResponse>), ApiError> {
    let buyer = buyer_from_headers(&headers)?;

    let cart = Cart::restore(req.items.into_iter().map(|item| {
        (
            ProductId::new(item.product_id),
            item.name,
            Money::from_rupiah(item.unit_price),
            item.image_url,
            item.quantity,
        )
    }));

    let shipping = ShippingInfo {
        name: req.shipping.name,
        phone: req.shipping.phone,
        address: req.shipping.address,
        notes: req.shipping.notes,
    };

    let placed = state
        .checkout
        .place_order(Some(buyer), &cart, &shipping)
        .await?;

    let response = CheckoutResponse {
        order_id: placed.order_id().to_string(),
        status: placed.status().to_string(),
        status_label: status_label(placed.status()),
        total: placed.order.total.rupiah(),
    };

    Ok((axum::http::StatusCode::CREATED, Json(response)))
}
