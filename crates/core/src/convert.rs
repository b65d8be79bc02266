//! Mapping between the wire form and the normalized form of an order.
//!
//! The two representations carry the same logical order; the mapping is
//! lossless except for two documented representation changes: the payment
//! timestamp is Unix epoch seconds on the wire and an absolute timestamp in
//! storage, and the order/transaction id is a string on the wire and a typed
//! [`OrderId`] in storage.
//!
//! Both directions are pure and side-effect free.

use chrono::DateTime;

use crate::domain::{Delivery, FullOrder, Item, Order, OrderId, Payment};
use crate::wire;

/// Error converting a wire-form order to its normalized form.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The `order_uid` field is not a well-formed order id.
    #[error("malformed order id {0:?}")]
    InvalidOrderId(String),
    /// The payment timestamp does not map to a representable point in time.
    #[error("payment timestamp {0} out of range")]
    TimestampOutOfRange(i64),
}

/// Convert a wire-form order into the four normalized records.
///
/// The payment's `transaction` is set to the order id regardless of the wire
/// field, preserving the invariant that the two are always equal.
///
/// # Errors
///
/// Returns [`ConvertError`] if the order id cannot be parsed or the payment
/// timestamp is out of range. No partial result is produced.
pub fn wire_to_domain(
    order: &wire::Order,
) -> Result<(Order, Delivery, Payment, Vec<Item>), ConvertError> {
    let id = OrderId::parse(&order.order_uid)
        .map_err(|_| ConvertError::InvalidOrderId(order.order_uid.clone()))?;
    let payment_dt = DateTime::from_timestamp(order.payment.payment_dt, 0)
        .ok_or(ConvertError::TimestampOutOfRange(order.payment.payment_dt))?;

    let header = Order {
        id,
        track_number: order.track_number.clone(),
        entry: order.entry.clone(),
        locale: order.locale.clone(),
        internal_signature: order.internal_signature.clone(),
        customer_id: order.customer_id.clone(),
        delivery_service: order.delivery_service.clone(),
        shardkey: order.shardkey.clone(),
        sm_id: order.sm_id,
        date_created: order.date_created,
        oof_shard: order.oof_shard.clone(),
    };

    let delivery = Delivery {
        order_id: id,
        name: order.delivery.name.clone(),
        phone: order.delivery.phone.clone(),
        zip: order.delivery.zip.clone(),
        city: order.delivery.city.clone(),
        address: order.delivery.address.clone(),
        region: order.delivery.region.clone(),
        email: order.delivery.email.clone(),
    };

    let payment = Payment {
        transaction: id,
        order_id: id,
        request_id: order.payment.request_id.clone(),
        currency: order.payment.currency.clone(),
        provider: order.payment.provider.clone(),
        amount: order.payment.amount,
        payment_dt,
        bank: order.payment.bank.clone(),
        delivery_cost: order.payment.delivery_cost,
        goods_total: order.payment.goods_total,
        custom_fee: order.payment.custom_fee,
    };

    let items = order
        .items
        .iter()
        .map(|item| Item {
            chrt_id: item.chrt_id,
            order_id: id,
            track_number: item.track_number.clone(),
            price: item.price,
            rid: item.rid.clone(),
            name: item.name.clone(),
            sale: item.sale,
            size: item.size.clone(),
            total_price: item.total_price,
            nm_id: item.nm_id,
            brand: item.brand.clone(),
            status: item.status,
        })
        .collect();

    Ok((header, delivery, payment, items))
}

/// Convert a fully expanded stored order back to its wire form.
#[must_use]
pub fn domain_to_wire(full: &FullOrder) -> wire::Order {
    let delivery = wire::Delivery {
        name: full.delivery.name.clone(),
        phone: full.delivery.phone.clone(),
        zip: full.delivery.zip.clone(),
        city: full.delivery.city.clone(),
        address: full.delivery.address.clone(),
        region: full.delivery.region.clone(),
        email: full.delivery.email.clone(),
    };

    let payment = wire::Payment {
        transaction: full.payment.transaction.to_string(),
        request_id: full.payment.request_id.clone(),
        currency: full.payment.currency.clone(),
        provider: full.payment.provider.clone(),
        amount: full.payment.amount,
        payment_dt: full.payment.payment_dt.timestamp(),
        bank: full.payment.bank.clone(),
        delivery_cost: full.payment.delivery_cost,
        goods_total: full.payment.goods_total,
        custom_fee: full.payment.custom_fee,
    };

    let items = full
        .items
        .iter()
        .map(|item| wire::Item {
            chrt_id: item.chrt_id,
            track_number: item.track_number.clone(),
            price: item.price,
            rid: item.rid.clone(),
            name: item.name.clone(),
            sale: item.sale,
            size: item.size.clone(),
            total_price: item.total_price,
            nm_id: item.nm_id,
            brand: item.brand.clone(),
            status: item.status,
        })
        .collect();

    wire::Order {
        order_uid: full.order.id.to_string(),
        track_number: full.order.track_number.clone(),
        entry: full.order.entry.clone(),
        delivery,
        payment,
        items,
        locale: full.order.locale.clone(),
        internal_signature: full.order.internal_signature.clone(),
        customer_id: full.order.customer_id.clone(),
        delivery_service: full.order.delivery_service.clone(),
        shardkey: full.order.shardkey.clone(),
        sm_id: full.order.sm_id,
        date_created: full.order.date_created,
        oof_shard: full.order.oof_shard.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wire_order() -> wire::Order {
        wire::Order {
            order_uid: "6ba7b810-9dad-11d1-80b4-00c04fd430c8".to_owned(),
            track_number: "WBILMTESTTRACK".to_owned(),
            entry: "WBIL".to_owned(),
            delivery: wire::Delivery {
                name: "Test Testov".to_owned(),
                phone: "+9720000000".to_owned(),
                zip: "2639809".to_owned(),
                city: "Kiryat Mozkin".to_owned(),
                address: "Ploshad Mira 15".to_owned(),
                region: "Kraiot".to_owned(),
                email: "test@gmail.com".to_owned(),
            },
            payment: wire::Payment {
                transaction: "6ba7b810-9dad-11d1-80b4-00c04fd430c8".to_owned(),
                request_id: String::new(),
                currency: "USD".to_owned(),
                provider: "wbpay".to_owned(),
                amount: 1817,
                payment_dt: 1_637_907_727,
                bank: "alpha".to_owned(),
                delivery_cost: 1500,
                goods_total: 317,
                custom_fee: 0,
            },
            items: vec![wire::Item {
                chrt_id: 9_934_930,
                track_number: "WBILMTESTTRACK".to_owned(),
                price: 453,
                rid: "ab4219087a764ae0btest".to_owned(),
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
            customer_id: "test".to_owned(),
            delivery_service: "meest".to_owned(),
            shardkey: "9".to_owned(),
            sm_id: 99,
            date_created: "2021-11-26T06:22:19Z".parse().unwrap(),
            oof_shard: "1".to_owned(),
        }
    }

    #[test]
    fn test_round_trip_is_field_equal() {
        let original = sample_wire_order();
        let (order, delivery, payment, items) = wire_to_domain(&original).unwrap();
        let full = FullOrder {
            order,
            delivery,
            payment,
            items,
        };
        assert_eq!(domain_to_wire(&full), original);
    }

    #[test]
    fn test_timestamp_and_id_representations() {
        let original = sample_wire_order();
        let (order, _, payment, _) = wire_to_domain(&original).unwrap();
        assert_eq!(payment.payment_dt.timestamp(), original.payment.payment_dt);
        assert_eq!(order.id.to_string(), original.order_uid);
    }

    #[test]
    fn test_transaction_is_forced_to_order_id() {
        let mut original = sample_wire_order();
        original.payment.transaction = "something-else-entirely".to_owned();
        let (order, _, payment, _) = wire_to_domain(&original).unwrap();
        assert_eq!(payment.transaction, order.id);
        assert_eq!(payment.order_id, order.id);
    }

    #[test]
    fn test_malformed_order_id_is_rejected() {
        let mut original = sample_wire_order();
        original.order_uid = "b563feb7b2b84b6test".to_owned();
        let err = wire_to_domain(&original).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidOrderId(_)));
    }

    #[test]
    fn test_out_of_range_timestamp_is_rejected() {
        let mut original = sample_wire_order();
        original.payment.payment_dt = i64::MAX;
        let err = wire_to_domain(&original).unwrap_err();
        assert!(matches!(err, ConvertError::TimestampOutOfRange(_)));
    }

    #[test]
    fn test_empty_items_convert_both_ways() {
        let mut original = sample_wire_order();
        original.items.clear();
        let (order, delivery, payment, items) = wire_to_domain(&original).unwrap();
        assert!(items.is_empty());
        let full = FullOrder {
            order,
            delivery,
            payment,
            items,
        };
        assert_eq!(domain_to_wire(&full).items.len(), 0);
    }
}
