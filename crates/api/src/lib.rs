//! HTTP API server with observability for the marketplace checkout core.
//!
//! Exposes the catalog, checkout submission, and per-buyer order history,
//! with structured logging (tracing) and Prometheus metrics. The buyer is
//! identified by the `x-buyer-id` request header.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let render_metrics = move || {
        let body = metrics_handle.render();
        async move {
            (
                [(
                    axum::http::header::CONTENT_TYPE,
                    "text/plain; version=0.0.4; charset=utf-8",
                )],
                body,
            )
        }
    };

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::products::list::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/checkout", post(routes::checkout::submit::<S>))
        .route("/orders", get(routes::orders::history::<S>))
        .with_state(state)
        .route("/metrics", get(render_metrics))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the checkout service and the history reader around one store.
pub fn create_default_state<S: OrderStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    use domain::CheckoutService;
    use history::OrderHistoryReader;

    Arc::new(AppState {
        checkout: CheckoutService::new(store.clone()),
        history: OrderHistoryReader::new(store.clone()),
        store,
    })
}
