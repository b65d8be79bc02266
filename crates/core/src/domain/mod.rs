//! Normalized order records.
//!
//! These are the typed representations the durable store works with:
//! structured identifiers, absolute timestamps, one struct per table. The
//! loosely-typed counterpart lives in [`crate::wire`].

mod id;
mod order;

pub use id::{OrderId, ParseOrderIdError};
pub use order::{Delivery, FullOrder, Item, Order, Payment};
