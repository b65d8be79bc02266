//! Database access for the durable order store.
//!
//! ## Tables
//!
//! - `orders` - Order headers, write-once by primary key
//! - `delivery` - 1:1 delivery record per order
//! - `payment` - 1:1 payment record per order
//! - `items` - 0:N order lines
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/server/migrations/` and run at
//! startup via [`run_migrations`].

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use orderline_core::domain::{Delivery, FullOrder, Item, Order, OrderId, Payment};

mod orders;

pub use orders::PgOrderStore;

/// Error returned by [`OrderStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An order with the same id is already persisted (write-once conflict).
    #[error("order already exists")]
    Conflict,
    /// No order with the requested id.
    #[error("order not found")]
    NotFound,
    /// A stored order is missing one of its mandatory parts.
    #[error("data corruption: {0}")]
    DataCorruption(String),
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable store for fully expanded orders.
///
/// The store is the single source of truth. All four records of one order
/// become visible atomically or not at all; callers never observe a header
/// without its delivery and payment.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order atomically across its four constituent records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if an order with the same id already
    /// exists, [`StoreError::Database`] for any other failure. Nothing is
    /// written in either case.
    async fn create_order(
        &self,
        order: &Order,
        delivery: &Delivery,
        payment: &Payment,
        items: &[Item],
    ) -> Result<(), StoreError>;

    /// Fetch a fully expanded order by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such order exists.
    async fn get_order(&self, id: OrderId) -> Result<FullOrder, StoreError>;

    /// Fetch up to `limit` most recently created orders, newest first.
    ///
    /// An empty result is success, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the fetch fails.
    async fn get_last_orders(&self, limit: i64) -> Result<Vec<FullOrder>, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the embedded schema migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
