//! API server entry point.

use api::config::Config;
use common::Money;
use order_store::{InMemoryOrderStore, NewProduct, OrderStore, PostgresOrderStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Builds the app around `store` and serves it until shutdown.
async fn serve<S: OrderStore + Clone + 'static>(
    store: S,
    config: &Config,
    metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
) {
    let state = api::create_default_state(store);
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

/// Demo catalog for running without a database.
async fn seed_demo_catalog(store: &InMemoryOrderStore) {
    for (name, price, stock, seller) in [
        ("Keripik Pisang", 15_000_i64, 25_u32, "Warung Bu Sari"),
        ("Kopi Gayo 250g", 45_000, 12, "Kedai Aceh"),
        ("Kain Batik Tulis", 250_000, 4, "Galeri Batik Sekar"),
        ("Madu Hutan 500ml", 85_000, 8, "Kelompok Tani Rimba"),
    ] {
        store
            .insert_product(NewProduct {
                name: name.to_string(),
                price: Money::from_rupiah(price),
                stock,
                seller: seller.to_string(),
                image_url: None,
            })
            .await
            .expect("failed to seed demo catalog");
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    match config.database_url.clone() {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .connect(&url)
                .await
                .expect("failed to connect to PostgreSQL");
            let store = PostgresOrderStore::new(pool);
            store.run_migrations().await.expect("migrations failed");
            tracing::info!("using PostgreSQL order store");
            serve(store, &config, metrics_handle).await;
        }
        None => {
            let store = InMemoryOrderStore::new();
            seed_demo_catalog(&store).await;
            tracing::info!("DATABASE_URL not set, using in-memory order store");
            serve(store, &config, metrics_handle).await;
        }
    }
}
