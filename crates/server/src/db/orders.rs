//! `PostgreSQL` implementation of the order store.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use orderline_core::domain::{Delivery, FullOrder, Item, Order, OrderId, Payment};

use super::{OrderStore, StoreError};

/// Order store backed by a `PostgreSQL` pool.
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_order_header(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, track_number, entry, locale, internal_signature, customer_id,
                   delivery_service, shardkey, sm_id, date_created, oof_shard
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn fetch_parts(
        &self,
        ids: &[Uuid],
    ) -> Result<
        (
            HashMap<OrderId, Delivery>,
            HashMap<OrderId, Payment>,
            HashMap<OrderId, Vec<Item>>,
        ),
        StoreError,
    > {
        let delivery_rows = sqlx::query(
            r"
            SELECT order_id, name, phone, zip, city, address, region, email
            FROM delivery
            WHERE order_id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut deliveries = HashMap::with_capacity(delivery_rows.len());
        for row in &delivery_rows {
            let delivery = delivery_from_row(row)?;
            deliveries.insert(delivery.order_id, delivery);
        }

        let payment_rows = sqlx::query(
            r"
            SELECT transaction, order_id, request_id, currency, provider, amount,
                   payment_dt, bank, delivery_cost, goods_total, custom_fee
            FROM payment
            WHERE order_id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut payments = HashMap::with_capacity(payment_rows.len());
        for row in &payment_rows {
            let payment = payment_from_row(row)?;
            payments.insert(payment.order_id, payment);
        }

        let item_rows = sqlx::query(
            r"
            SELECT chrt_id, order_id, track_number, price, rid, name, sale, size,
                   total_price, nm_id, brand, status
            FROM items
            WHERE order_id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items: HashMap<OrderId, Vec<Item>> = HashMap::new();
        for row in &item_rows {
            let item = item_from_row(row)?;
            items.entry(item.order_id).or_default().push(item);
        }

        Ok((deliveries, payments, items))
    }

    /// Join headers with their parts, failing if a mandatory part is missing.
    fn assemble(
        orders: Vec<Order>,
        mut deliveries: HashMap<OrderId, Delivery>,
        mut payments: HashMap<OrderId, Payment>,
        mut items: HashMap<OrderId, Vec<Item>>,
    ) -> Result<Vec<FullOrder>, StoreError> {
        orders
            .into_iter()
            .map(|order| {
                let id = order.id;
                let delivery = deliveries
                    .remove(&id)
                    .ok_or_else(|| StoreError::DataCorruption(format!("order {id} has no delivery row")))?;
                let payment = payments
                    .remove(&id)
                    .ok_or_else(|| StoreError::DataCorruption(format!("order {id} has no payment row")))?;
                Ok(FullOrder {
                    order,
                    delivery,
                    payment,
                    items: items.remove(&id).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create_order(
        &self,
        order: &Order,
        delivery: &Delivery,
        payment: &Payment,
        items: &[Item],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO orders (id, track_number, entry, locale, internal_signature,
                                customer_id, delivery_service, shardkey, sm_id,
                                date_created, oof_shard)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(order.id)
        .bind(&order.track_number)
        .bind(&order.entry)
        .bind(&order.locale)
        .bind(&order.internal_signature)
        .bind(&order.customer_id)
        .bind(&order.delivery_service)
        .bind(&order.shardkey)
        .bind(order.sm_id)
        .bind(order.date_created)
        .bind(&order.oof_shard)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Conflict;
            }
            StoreError::Database(e)
        })?;

        sqlx::query(
            r"
            INSERT INTO delivery (order_id, name, phone, zip, city, address, region, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(delivery.order_id)
        .bind(&delivery.name)
        .bind(&delivery.phone)
        .bind(&delivery.zip)
        .bind(&delivery.city)
        .bind(&delivery.address)
        .bind(&delivery.region)
        .bind(&delivery.email)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO payment (transaction, order_id, request_id, currency, provider,
                                 amount, payment_dt, bank, delivery_cost, goods_total,
                                 custom_fee)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(payment.transaction)
        .bind(payment.order_id)
        .bind(&payment.request_id)
        .bind(&payment.currency)
        .bind(&payment.provider)
        .bind(payment.amount)
        .bind(payment.payment_dt)
        .bind(&payment.bank)
        .bind(payment.delivery_cost)
        .bind(payment.goods_total)
        .bind(payment.custom_fee)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO items (chrt_id, order_id, track_number, price, rid, name,
                                   sale, size, total_price, nm_id, brand, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ",
            )
            .bind(item.chrt_id)
            .bind(item.order_id)
            .bind(&item.track_number)
            .bind(item.price)
            .bind(&item.rid)
            .bind(&item.name)
            .bind(item.sale)
            .bind(&item.size)
            .bind(item.total_price)
            .bind(item.nm_id)
            .bind(&item.brand)
            .bind(item.status)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<FullOrder, StoreError> {
        let Some(order) = self.fetch_order_header(id).await? else {
            return Err(StoreError::NotFound);
        };

        let ids = [id.as_uuid()];
        let (deliveries, payments, items) = self.fetch_parts(&ids).await?;
        let mut full = Self::assemble(vec![order], deliveries, payments, items)?;
        full.pop()
            .ok_or_else(|| StoreError::DataCorruption(format!("order {id} vanished during fetch")))
    }

    async fn get_last_orders(&self, limit: i64) -> Result<Vec<FullOrder>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT id, track_number, entry, locale, internal_signature, customer_id,
                   delivery_service, shardkey, sm_id, date_created, oof_shard
            FROM orders
            ORDER BY date_created DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let orders = rows
            .iter()
            .map(order_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id.as_uuid()).collect();
        let (deliveries, payments, items) = self.fetch_parts(&ids).await?;
        Self::assemble(orders, deliveries, payments, items)
    }
}

// =============================================================================
// Row mapping
// =============================================================================

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    Ok(Order {
        id: row.try_get("id")?,
        track_number: row.try_get("track_number")?,
        entry: row.try_get("entry")?,
        locale: row.try_get("locale")?,
        internal_signature: row.try_get("internal_signature")?,
        customer_id: row.try_get("customer_id")?,
        delivery_service: row.try_get("delivery_service")?,
        shardkey: row.try_get("shardkey")?,
        sm_id: row.try_get("sm_id")?,
        date_created: row.try_get("date_created")?,
        oof_shard: row.try_get("oof_shard")?,
    })
}

fn delivery_from_row(row: &PgRow) -> Result<Delivery, StoreError> {
    Ok(Delivery {
        order_id: row.try_get("order_id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        zip: row.try_get("zip")?,
        city: row.try_get("city")?,
        address: row.try_get("address")?,
        region: row.try_get("region")?,
        email: row.try_get("email")?,
    })
}

fn payment_from_row(row: &PgRow) -> Result<Payment, StoreError> {
    Ok(Payment {
        transaction: row.try_get("transaction")?,
        order_id: row.try_get("order_id")?,
        request_id: row.try_get("request_id")?,
        currency: row.try_get("currency")?,
        provider: row.try_get("provider")?,
        amount: row.try_get("amount")?,
        payment_dt: row.try_get("payment_dt")?,
        bank: row.try_get("bank")?,
        delivery_cost: row.try_get("delivery_cost")?,
        goods_total: row.try_get("goods_total")?,
        custom_fee: row.try_get("custom_fee")?,
    })
}

fn item_from_row(row: &PgRow) -> Result<Item, StoreError> {
    Ok(Item {
        chrt_id: row.try_get("chrt_id")?,
        order_id: row.try_get("order_id")?,
        track_number: row.try_get("track_number")?,
        price: row.try_get("price")?,
        rid: row.try_get("rid")?,
        name: row.try_get("name")?,
        sale: row.try_get("sale")?,
        size: row.try_get("size")?,
        total_price: row.try_get("total_price")?,
        nm_id: row.try_get("nm_id")?,
        brand: row.try_get("brand")?,
        status: row.try_get("status")?,
    })
}
