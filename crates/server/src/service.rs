//! Order service orchestration.
//!
//! The single code path between the two entry points (ingestion, read API)
//! and the cache/store pair. It enforces the consistency contract that makes
//! the cache correct: the cache is always consulted before the store on read,
//! and always updated after a successful write.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use orderline_core::convert::{self, ConvertError};
use orderline_core::domain::OrderId;
use orderline_core::wire;

use crate::cache::OrderCache;
use crate::db::{OrderStore, StoreError};

/// Failure modes of [`OrderService`] operations.
///
/// All failures are terminal for the single request; nothing here retries.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Create attempt for an id that is already persisted (write-once).
    #[error("order already exists")]
    AlreadyExists,
    /// Lookup for an id absent from both cache and store.
    #[error("order not found")]
    NotFound,
    /// Lookup with a syntactically malformed order id.
    #[error("invalid order id")]
    InvalidId,
    /// The record could not be mapped to its normalized form.
    #[error(transparent)]
    Conversion(#[from] ConvertError),
    /// Unexpected store failure.
    #[error("order store failure")]
    Store(#[source] StoreError),
}

/// Orchestrates order creation and lookup over the store and the cache.
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    cache: OrderCache,
}

impl OrderService {
    /// Create a service over an existing store and cache.
    #[must_use]
    pub fn new(store: Arc<dyn OrderStore>, cache: OrderCache) -> Self {
        Self { store, cache }
    }

    /// Persist a new order and make it visible to reads.
    ///
    /// Sequence: convert, persist, then write the wire form into the cache
    /// (write-aside). The cache write happens only after the store accepted
    /// the order and cannot fail the operation; the persisted write is never
    /// rolled back for the cache's sake.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Conversion`] if the record is malformed (nothing is
    /// touched), [`ServiceError::AlreadyExists`] on a duplicate id,
    /// [`ServiceError::Store`] on any other store failure (cache untouched
    /// in both cases).
    #[instrument(skip(self, order), fields(order_uid = %order.order_uid))]
    pub async fn create_order(&self, order: wire::Order) -> Result<(), ServiceError> {
        let (header, delivery, payment, items) = convert::wire_to_domain(&order)?;

        match self
            .store
            .create_order(&header, &delivery, &payment, &items)
            .await
        {
            Ok(()) => {}
            Err(StoreError::Conflict) => return Err(ServiceError::AlreadyExists),
            Err(e) => return Err(ServiceError::Store(e)),
        }

        self.cache.set(header.id, order).await;
        Ok(())
    }

    /// Look up an order by its textual id.
    ///
    /// The cache is consulted before the store; a hit never touches the
    /// store. On a miss the store value is converted back to wire form and
    /// written into the cache, so repeated lookups of a cold key stop
    /// hitting the store.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidId`] if `id` is not well-formed (neither cache
    /// nor store is consulted), [`ServiceError::NotFound`] if the order is
    /// absent from both, [`ServiceError::Store`] on any other store failure.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &str) -> Result<wire::Order, ServiceError> {
        let id = OrderId::parse(id).map_err(|_| ServiceError::InvalidId)?;

        if let Some(order) = self.cache.get(id).await {
            return Ok(order);
        }

        let full = match self.store.get_order(id).await {
            Ok(full) => full,
            Err(StoreError::NotFound) => return Err(ServiceError::NotFound),
            Err(e) => return Err(ServiceError::Store(e)),
        };

        let order = convert::domain_to_wire(&full);
        self.cache.set(id, order.clone()).await;
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{InMemoryStore, full_order, wire_order};

    fn service_with_store() -> (Arc<InMemoryStore>, OrderService) {
        let store = Arc::new(InMemoryStore::default());
        let cache = OrderCache::new(store.clone(), 1000);
        let service = OrderService::new(store.clone(), cache);
        (store, service)
    }

    #[tokio::test]
    async fn test_read_your_writes_without_store_round_trip() {
        let (store, service) = service_with_store();
        let order = wire_order(1);

        service.create_order(order.clone()).await.unwrap();

        // Fail every subsequent read: a hit must come from the cache alone.
        store.fail_reads(true);
        let fetched = service.get_order(&order.order_uid).await.unwrap();
        assert_eq!(fetched, order);
        assert_eq!(store.read_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_twice_is_a_conflict() {
        let (store, service) = service_with_store();
        let order = wire_order(1);

        service.create_order(order.clone()).await.unwrap();
        let err = service.create_order(order).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists));
        assert_eq!(store.order_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_miss_falls_back_to_store() {
        let (store, service) = service_with_store();
        let full = full_order(3);
        store.seed(full.clone());

        let fetched = service.get_order(&full.order.id.to_string()).await.unwrap();
        assert_eq!(fetched.order_uid, full.order.id.to_string());
        assert_eq!(store.read_calls(), 1);
    }

    #[tokio::test]
    async fn test_read_miss_populates_cache() {
        let (store, service) = service_with_store();
        let full = full_order(3);
        store.seed(full.clone());
        let id = full.order.id.to_string();

        service.get_order(&id).await.unwrap();

        // The first miss populated the cache; the store can now fail.
        store.fail_reads(true);
        assert!(service.get_order(&id).await.is_ok());
        assert_eq!(store.read_calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_order_is_not_found() {
        let (_, service) = service_with_store();
        let err = service
            .get_order("6ba7b810-9dad-11d1-80b4-00c04fd430c8")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));
    }

    #[tokio::test]
    async fn test_invalid_id_short_circuits() {
        let (store, service) = service_with_store();
        store.fail_everything(true);

        let err = service.get_order("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidId));
        assert_eq!(store.read_calls(), 0);
    }

    #[tokio::test]
    async fn test_conversion_failure_touches_nothing() {
        let (store, service) = service_with_store();
        let mut order = wire_order(1);
        order.order_uid = "definitely-not-a-uuid".to_owned();

        let err = service.create_order(order).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conversion(_)));
        assert_eq!(store.create_calls(), 0);
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_on_create_leaves_cache_cold() {
        let (store, service) = service_with_store();
        store.fail_everything(true);
        let order = wire_order(1);

        let err = service.create_order(order.clone()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));

        // Nothing was cached: once the store recovers the order is absent.
        store.fail_everything(false);
        let err = service.get_order(&order.order_uid).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));
    }

    #[tokio::test]
    async fn test_generic_store_failure_is_not_not_found() {
        let (store, service) = service_with_store();
        store.fail_reads(true);

        let err = service
            .get_order("6ba7b810-9dad-11d1-80b4-00c04fd430c8")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
    }
}
