//! Bounded in-process cache of wire-form orders.
//!
//! The cache is the single in-memory view of recently-seen orders, shared by
//! the ingestion path (write-aside after a successful persist) and the read
//! path (read-through on miss). It owns all of its synchronization; callers
//! never lock.

use std::sync::Arc;

use moka::future::Cache;

use orderline_core::convert;
use orderline_core::domain::OrderId;
use orderline_core::wire;

use crate::db::{OrderStore, StoreError};

/// Bounded key→order cache with a one-time startup preload.
///
/// Entries are evicted by moka's size-based policy once `capacity` is
/// exceeded; recently used entries survive longer than cold ones, but the
/// exact victim choice is not a contract anyone may rely on. Values are
/// cloned whole on both `set` and `get`, so a concurrent reader observes a
/// value entirely from one write, never a mix of two.
#[derive(Clone)]
pub struct OrderCache {
    entries: Cache<OrderId, wire::Order>,
    store: Arc<dyn OrderStore>,
}

impl OrderCache {
    /// Create a cache bounded to `capacity` entries.
    #[must_use]
    pub fn new(store: Arc<dyn OrderStore>, capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            store,
        }
    }

    /// Insert or overwrite the entry for `id`.
    ///
    /// Never fails; may evict other entries to satisfy the capacity bound.
    pub async fn set(&self, id: OrderId, order: wire::Order) {
        self.entries.insert(id, order).await;
    }

    /// Look up `id`. A miss is a normal outcome, not an error.
    pub async fn get(&self, id: OrderId) -> Option<wire::Order> {
        self.entries.get(&id).await
    }

    /// Seed the cache with up to `limit` most recently created orders.
    ///
    /// Intended to run once at startup, before the service is considered
    /// warm. A store fetch returning zero rows is success with no effect.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if the store fetch fails.
    pub async fn preload(&self, limit: i64) -> Result<(), StoreError> {
        let orders = self.store.get_last_orders(limit).await?;
        let seeded = orders.len();
        for full in &orders {
            self.set(full.order.id, convert::domain_to_wire(full)).await;
        }
        tracing::info!(seeded, "order cache preloaded from store");
        Ok(())
    }
}
