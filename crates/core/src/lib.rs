//! Orderline Core - Shared order types.
//!
//! This crate provides the order representations used across Orderline:
//!
//! - [`domain`] - Normalized records as persisted in the durable store
//! - [`wire`] - The flat representation exchanged with the message topic and
//!   the read API
//! - [`convert`] - The lossless mapping between the two
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no message broker clients. This keeps it lightweight and
//! allows it to be used anywhere, including test doubles.
//!
//! With the `postgres` feature enabled, [`domain::OrderId`] can be bound
//! directly in sqlx queries.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod convert;
pub mod domain;
pub mod wire;
