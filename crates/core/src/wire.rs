//! Wire-form order representation.
//!
//! This is the shape exchanged with the message topic and returned by the
//! read API: flat serde structs, the order id as a string, the payment
//! timestamp as Unix epoch seconds. The ingestion path validates records
//! against the `validator` rules below before anything else touches them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A complete order as published on the topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Order {
    /// Order id, canonical UUID string.
    #[validate(length(min = 1))]
    pub order_uid: String,
    /// Carrier track number.
    #[validate(length(min = 1))]
    pub track_number: String,
    /// Entry channel.
    #[validate(length(min = 1))]
    pub entry: String,
    /// Delivery details.
    #[validate(nested)]
    pub delivery: Delivery,
    /// Payment details.
    #[validate(nested)]
    pub payment: Payment,
    /// Order lines; may be empty.
    #[validate(nested)]
    pub items: Vec<Item>,
    /// Customer locale.
    pub locale: String,
    /// Opaque publisher signature; often empty.
    #[serde(default)]
    pub internal_signature: String,
    /// Customer identifier.
    #[validate(length(min = 1))]
    pub customer_id: String,
    /// Delivery service name.
    pub delivery_service: String,
    /// Shard key assigned by the publisher.
    pub shardkey: String,
    /// Shard index.
    pub sm_id: i64,
    /// Creation timestamp, RFC 3339.
    pub date_created: DateTime<Utc>,
    /// Out-of-fulfillment shard.
    pub oof_shard: String,
}

/// Delivery details of a wire-form order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Delivery {
    /// Recipient name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Recipient phone number.
    #[validate(length(min = 1))]
    pub phone: String,
    /// Postal code.
    pub zip: String,
    /// City.
    #[validate(length(min = 1))]
    pub city: String,
    /// Street address.
    #[validate(length(min = 1))]
    pub address: String,
    /// Region.
    pub region: String,
    /// Recipient email.
    #[validate(email)]
    pub email: String,
}

/// Payment details of a wire-form order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Payment {
    /// Transaction id. Ignored on ingest; the stored value is the order id.
    pub transaction: String,
    /// Payment request id; often empty.
    #[serde(default)]
    pub request_id: String,
    /// Currency code.
    #[validate(length(min = 1))]
    pub currency: String,
    /// Payment provider.
    #[validate(length(min = 1))]
    pub provider: String,
    /// Total charged amount, in minor currency units.
    #[validate(range(min = 0))]
    pub amount: i64,
    /// Payment timestamp, Unix epoch seconds.
    pub payment_dt: i64,
    /// Issuing bank.
    pub bank: String,
    /// Delivery cost portion of the amount.
    #[validate(range(min = 0))]
    pub delivery_cost: i64,
    /// Goods portion of the amount.
    #[validate(range(min = 0))]
    pub goods_total: i64,
    /// Custom fee portion of the amount.
    #[validate(range(min = 0))]
    pub custom_fee: i64,
}

/// One line of a wire-form order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Item {
    /// Catalog id of the line.
    pub chrt_id: i64,
    /// Carrier track number for the line.
    #[validate(length(min = 1))]
    pub track_number: String,
    /// Unit price, in minor currency units.
    #[validate(range(min = 0))]
    pub price: i64,
    /// Secondary reference id.
    #[validate(length(min = 1))]
    pub rid: String,
    /// Item name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Discount percentage.
    pub sale: i32,
    /// Size label.
    pub size: String,
    /// Line total after discount.
    #[validate(range(min = 0))]
    pub total_price: i64,
    /// Numeric model id.
    pub nm_id: i64,
    /// Brand name.
    pub brand: String,
    /// Line status code.
    pub status: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "order_uid": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "track_number": "WBILMTESTTRACK",
            "entry": "WBIL",
            "delivery": {
                "name": "Test Testov",
                "phone": "+9720000000",
                "zip": "2639809",
                "city": "Kiryat Mozkin",
                "address": "Ploshad Mira 15",
                "region": "Kraiot",
                "email": "test@gmail.com"
            },
            "payment": {
                "transaction": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
                "request_id": "",
                "currency": "USD",
                "provider": "wbpay",
                "amount": 1817,
                "payment_dt": 1637907727,
                "bank": "alpha",
                "delivery_cost": 1500,
                "goods_total": 317,
                "custom_fee": 0
            },
            "items": [
                {
                    "chrt_id": 9934930,
                    "track_number": "WBILMTESTTRACK",
                    "price": 453,
                    "rid": "ab4219087a764ae0btest",
                    "name": "Mascaras",
                    "sale": 30,
                    "size": "0",
                    "total_price": 317,
                    "nm_id": 2389212,
                    "brand": "Vivienne Sabo",
                    "status": 202
                }
            ],
            "locale": "en",
            "internal_signature": "",
            "customer_id": "test",
            "delivery_service": "meest",
            "shardkey": "9",
            "sm_id": 99,
            "date_created": "2021-11-26T06:22:19Z",
            "oof_shard": "1"
        }"#
    }

    #[test]
    fn test_deserialize_topic_record() {
        let order: Order = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(order.order_uid, "6ba7b810-9dad-11d1-80b4-00c04fd430c8");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.payment.payment_dt, 1_637_907_727);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_serialize_round_trips() {
        let order: Order = serde_json::from_str(sample_json()).unwrap();
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_validation_rejects_blank_customer() {
        let mut order: Order = serde_json::from_str(sample_json()).unwrap();
        order.customer_id = String::new();
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_delivery_email() {
        let mut order: Order = serde_json::from_str(sample_json()).unwrap();
        order.delivery.email = "not-an-email".to_owned();
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_validation_checks_nested_items() {
        let mut order: Order = serde_json::from_str(sample_json()).unwrap();
        if let Some(item) = order.items.first_mut() {
            item.rid = String::new();
        }
        assert!(order.validate().is_err());
    }
}
