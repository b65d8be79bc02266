//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::service::OrderService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// order service and the database pool. It is constructed once at startup
/// and injected everywhere it is needed; there are no implicit singletons.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: Arc<OrderService>,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(service: Arc<OrderService>, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { service, pool }),
        }
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn service(&self) -> &OrderService {
        &self.inner.service
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }
}
