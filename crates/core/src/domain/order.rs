//! Order domain types.
//!
//! One struct per stored record. An order is created exactly once and never
//! mutated afterwards; delivery and payment always exist alongside the
//! header, items may be empty.

use chrono::{DateTime, Utc};

use super::OrderId;

/// Order header record.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Unique order id.
    pub id: OrderId,
    /// Carrier track number.
    pub track_number: String,
    /// Entry channel the order arrived through.
    pub entry: String,
    /// Customer locale.
    pub locale: String,
    /// Opaque signature set by the publisher; may be empty.
    pub internal_signature: String,
    /// Customer identifier.
    pub customer_id: String,
    /// Delivery service name.
    pub delivery_service: String,
    /// Shard key assigned by the publisher.
    pub shardkey: String,
    /// Shard index.
    pub sm_id: i64,
    /// When the order was created.
    pub date_created: DateTime<Utc>,
    /// Out-of-fulfillment shard.
    pub oof_shard: String,
}

/// Delivery record, 1:1 with an order.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Order this delivery belongs to.
    pub order_id: OrderId,
    /// Recipient name.
    pub name: String,
    /// Recipient phone number.
    pub phone: String,
    /// Postal code.
    pub zip: String,
    /// City.
    pub city: String,
    /// Street address.
    pub address: String,
    /// Region.
    pub region: String,
    /// Recipient email.
    pub email: String,
}

/// Payment record, 1:1 with an order.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    /// Transaction id; always equal to the order id.
    pub transaction: OrderId,
    /// Order this payment belongs to.
    pub order_id: OrderId,
    /// Payment request id; may be empty.
    pub request_id: String,
    /// Currency code.
    pub currency: String,
    /// Payment provider.
    pub provider: String,
    /// Total charged amount, in minor currency units.
    pub amount: i64,
    /// When the payment was made.
    pub payment_dt: DateTime<Utc>,
    /// Issuing bank.
    pub bank: String,
    /// Delivery cost portion of the amount.
    pub delivery_cost: i64,
    /// Goods portion of the amount.
    pub goods_total: i64,
    /// Custom fee portion of the amount.
    pub custom_fee: i64,
}

/// One order line.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Catalog id of the line.
    pub chrt_id: i64,
    /// Order this line belongs to.
    pub order_id: OrderId,
    /// Carrier track number for the line.
    pub track_number: String,
    /// Unit price, in minor currency units.
    pub price: i64,
    /// Secondary reference id.
    pub rid: String,
    /// Item name.
    pub name: String,
    /// Discount percentage.
    pub sale: i32,
    /// Size label.
    pub size: String,
    /// Line total after discount.
    pub total_price: i64,
    /// Numeric model id.
    pub nm_id: i64,
    /// Brand name.
    pub brand: String,
    /// Line status code.
    pub status: i32,
}

/// A fully expanded order: header plus its delivery, payment and lines.
#[derive(Debug, Clone, PartialEq)]
pub struct FullOrder {
    /// Order header.
    pub order: Order,
    /// Delivery record.
    pub delivery: Delivery,
    /// Payment record.
    pub payment: Payment,
    /// Order lines; may be empty.
    pub items: Vec<Item>,
}
