//! Test doubles and fixture builders shared across the crate's unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use orderline_core::convert;
use orderline_core::domain::{Delivery, FullOrder, Item, Order, OrderId, Payment};
use orderline_core::wire;

use crate::db::{OrderStore, StoreError};

/// In-memory [`OrderStore`] with failure toggles and call counters.
///
/// `fail_reads` makes every lookup fail with a generic database error;
/// `fail_everything` extends that to creates. Counters record how often the
/// store was reached, which is what the cache-consistency tests assert on.
#[derive(Default)]
pub struct InMemoryStore {
    orders: Mutex<HashMap<OrderId, FullOrder>>,
    fail_reads: AtomicBool,
    fail_everything: AtomicBool,
    read_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl InMemoryStore {
    /// Place an order directly into the store, bypassing the service.
    pub fn seed(&self, full: FullOrder) {
        self.orders
            .lock()
            .expect("store mutex poisoned")
            .insert(full.order.id, full);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_everything(&self, fail: bool) {
        self.fail_everything.store(fail, Ordering::SeqCst);
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().expect("store mutex poisoned").len()
    }

    fn reads_fail(&self) -> bool {
        self.fail_reads.load(Ordering::SeqCst) || self.fail_everything.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn create_order(
        &self,
        order: &Order,
        delivery: &Delivery,
        payment: &Payment,
        items: &[Item],
    ) -> Result<(), StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_everything.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut orders = self.orders.lock().expect("store mutex poisoned");
        if orders.contains_key(&order.id) {
            return Err(StoreError::Conflict);
        }
        orders.insert(
            order.id,
            FullOrder {
                order: order.clone(),
                delivery: delivery.clone(),
                payment: payment.clone(),
                items: items.to_vec(),
            },
        );
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<FullOrder, StoreError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.reads_fail() {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        self.orders
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_last_orders(&self, limit: i64) -> Result<Vec<FullOrder>, StoreError> {
        if self.reads_fail() {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut orders: Vec<FullOrder> = self
            .orders
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order.date_created.cmp(&a.order.date_created));
        orders.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(orders)
    }
}

/// Deterministic wire-form order; every field derives from `seq` so torn
/// values are detectable, and `date_created` increases with `seq`.
pub fn wire_order(seq: u32) -> wire::Order {
    let id = Uuid::from_u128(0x6ba7_b810_9dad_11d1_80b4_0000_0000_0000 + u128::from(seq));
    let base: chrono::DateTime<Utc> = "2021-11-26T06:22:19Z".parse().expect("valid timestamp");

    wire::Order {
        order_uid: id.to_string(),
        track_number: format!("TRACK-{seq}"),
        entry: "WBIL".to_owned(),
        delivery: wire::Delivery {
            name: format!("Recipient {seq}"),
            phone: "+9720000000".to_owned(),
            zip: "2639809".to_owned(),
            city: "Kiryat Mozkin".to_owned(),
            address: "Ploshad Mira 15".to_owned(),
            region: "Kraiot".to_owned(),
            email: format!("recipient{seq}@example.com"),
        },
        payment: wire::Payment {
            transaction: id.to_string(),
            request_id: String::new(),
            currency: "USD".to_owned(),
            provider: "wbpay".to_owned(),
            amount: 1817 + i64::from(seq),
            payment_dt: 1_637_907_727,
            bank: "alpha".to_owned(),
            delivery_cost: 1500,
            goods_total: 317,
            custom_fee: 0,
        },
        items: vec![wire::Item {
            chrt_id: 9_934_930 + i64::from(seq),
            track_number: format!("TRACK-{seq}"),
            price: 453,
            rid: format!("rid-{seq}"),
            name: "Mascaras".to_owned(),
            sale: 30,
            size: "0".to_owned(),
            total_price: 317,
            nm_id: 2_389_212,
            brand: "Vivienne Sabo".to_owned(),
            status: 202,
        }],
        locale: "en".to_owned(),
        internal_signature: String::new(),
        customer_id: format!("customer-{seq}"),
        delivery_service: "meest".to_owned(),
        shardkey: "9".to_owned(),
        sm_id: 99,
        date_created: base + Duration::seconds(i64::from(seq)),
        oof_shard: "1".to_owned(),
    }
}

/// The normalized form of [`wire_order`] for seeding stores directly.
pub fn full_order(seq: u32) -> FullOrder {
    let source = wire_order(seq);
    let (order, delivery, payment, items) =
        convert::wire_to_domain(&source).expect("fixture converts");
    FullOrder {
        order,
        delivery,
        payment,
        items,
    }
}
