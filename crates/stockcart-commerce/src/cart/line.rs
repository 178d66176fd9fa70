//! Cart line types.

use crate::error::CommerceError;
use crate::ids::{BuyerId, CartLineId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One buyer's request for one product.
///
/// A buyer holds at most one line per product and `ordered_quantity` is
/// always at least 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Unique line identifier.
    pub id: CartLineId,
    /// Owning buyer.
    pub buyer_id: BuyerId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Requested unit count.
    pub ordered_quantity: i64,
    /// When the line was created.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Create a new line with a fresh id.
    pub fn new(
        buyer_id: BuyerId,
        product_id: ProductId,
        ordered_quantity: i64,
    ) -> Result<Self, CommerceError> {
        if ordered_quantity < 1 {
            return Err(CommerceError::InvalidQuantity(ordered_quantity));
        }
        Ok(Self {
            id: CartLineId::generate(),
            buyer_id,
            product_id,
            ordered_quantity,
            added_at: Utc::now(),
        })
    }
}

/// Single-step quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityAction {
    #[serde(rename = "inc", alias = "increment")]
    Increment,
    #[serde(rename = "dec", alias = "decrement")]
    Decrement,
}

impl QuantityAction {
    /// Quantity after applying this action to `current`.
    ///
    /// No floor or stock bound is applied here.
    pub fn apply(self, current: i64) -> Result<i64, CommerceError> {
        match self {
            QuantityAction::Increment => current.checked_add(1),
            QuantityAction::Decrement => current.checked_sub(1),
        }
        .ok_or(CommerceError::Overflow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityAction::Increment => "inc",
            QuantityAction::Decrement => "dec",
        }
    }
}

impl fmt::Display for QuantityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityAction {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inc" | "increment" => Ok(QuantityAction::Increment),
            "dec" | "decrement" => Ok(QuantityAction::Decrement),
            other => Err(CommerceError::InvalidInput(format!(
                "action must be inc or dec, got {other:?}"
            ))),
        }
    }
}
