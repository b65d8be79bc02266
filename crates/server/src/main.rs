//! Orderline server - order ingestion and lookup service.
//!
//! # Architecture
//!
//! - Kafka topic feeds a single sequential ingestion worker
//! - `PostgreSQL` is the durable source of truth
//! - A bounded in-process cache absorbs read traffic
//! - Axum serves point lookups by order id
//!
//! # Lifecycle
//!
//! Startup: config, tracing, database pool, migrations, cache preload
//! (fatal on failure), then ingestion and the read API run concurrently.
//! On SIGINT/SIGTERM the ingestion worker is cancelled first, then in-flight
//! requests drain, then the process exits.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orderline_server::cache::OrderCache;
use orderline_server::config::ServerConfig;
use orderline_server::db::{self, OrderStore, PgOrderStore};
use orderline_server::ingest::{IngestWorker, OrderConsumer};
use orderline_server::routes;
use orderline_server::service::OrderService;
use orderline_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "orderline_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Store, cache, service
    let store: Arc<dyn OrderStore> = Arc::new(PgOrderStore::new(pool.clone()));
    let cache = OrderCache::new(Arc::clone(&store), config.cache.capacity);

    // Seed the cache before serving reads; a cold start against an
    // unreachable store is a startup failure, not a degraded mode.
    cache
        .preload(config.cache.preload_limit)
        .await
        .expect("Failed to preload order cache");

    let service = Arc::new(OrderService::new(store, cache));

    // Start the ingestion worker
    let shutdown = CancellationToken::new();
    let consumer = OrderConsumer::new(&config.kafka).expect("Failed to create Kafka consumer");
    let ingest = IngestWorker::new(consumer, Arc::clone(&service), shutdown.clone());
    let ingest_handle = tokio::spawn(ingest.run());

    // Build router
    let state = AppState::new(service, pool);
    let app = routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("orderline listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let ingest_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Stop consuming before draining requests so no new orders race
            // the shutdown.
            ingest_shutdown.cancel();
        })
        .await
        .expect("Server error");

    if let Err(e) = ingest_handle.await {
        tracing::error!(error = %e, "ingestion worker failed to stop cleanly");
    }

    tracing::info!("application stopped");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
