//! Type-safe order identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a string is not a well-formed order id.
#[derive(Debug, thiserror::Error)]
#[error("invalid order id: {0}")]
pub struct ParseOrderIdError(#[from] uuid::Error);

/// Unique identifier of an order.
///
/// Wraps a UUID so order ids cannot be mixed up with the other string-typed
/// fields of an order (track numbers, customer ids) at compile time. The wire
/// form is the canonical hyphenated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct OrderId(Uuid);

impl OrderId {
    /// Create an order id from an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an order id from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseOrderIdError`] if `s` is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, ParseOrderIdError> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for OrderId {
    type Err = ParseOrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        let id = OrderId::parse("0198f9d3-9d3b-7b2e-9c7e-4a1f6f2b8c11").unwrap();
        assert_eq!(id.to_string(), "0198f9d3-9d3b-7b2e-9c7e-4a1f6f2b8c11");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(OrderId::parse("not-a-uuid").is_err());
        assert!(OrderId::parse("").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = OrderId::new(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
