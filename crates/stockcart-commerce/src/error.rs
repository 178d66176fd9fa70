//! Commerce error types.

use crate::ids::{BuyerId, ProductId};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in cart operations.
///
/// Every variant is detected before any write is attempted, so an error
/// always means the store is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Malformed identifier or out-of-range quantity.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The buyer already holds a line for this product.
    #[error("Product {product_id} is already in the cart of {buyer_id}")]
    DuplicateLine {
        buyer_id: BuyerId,
        product_id: ProductId,
    },

    /// The line changed between read and write.
    #[error("Cart line for {product_id} was modified concurrently")]
    ConcurrentModification { product_id: ProductId },

    /// Requested quantity exceeds catalog stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Quantity would fall below one.
    #[error("Invalid quantity {0}: a cart line holds at least 1 unit")]
    InvalidQuantity(i64),

    /// Update requested for a product that is not in the cart.
    #[error("Product {0} is not in the cart; add it first")]
    LineNotInCart(ProductId),

    /// Lines priced in different currencies.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl CommerceError {
    /// Classify this error for the boundary layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::InvalidInput(_) => ErrorKind::InvalidInput,
            CommerceError::ProductNotFound(_) => ErrorKind::NotFound,
            CommerceError::DuplicateLine { .. } | CommerceError::ConcurrentModification { .. } => {
                ErrorKind::Conflict
            }
            CommerceError::OutOfStock { .. } => ErrorKind::OutOfStock,
            CommerceError::InvalidQuantity(_) => ErrorKind::InvalidQuantity,
            CommerceError::LineNotInCart(_) => ErrorKind::PreconditionFailed,
            CommerceError::CurrencyMismatch { .. }
            | CommerceError::Overflow
            | CommerceError::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Transport-agnostic failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Conflict,
    OutOfStock,
    InvalidQuantity,
    PreconditionFailed,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::OutOfStock => "out_of_stock",
            ErrorKind::InvalidQuantity => "invalid_quantity",
            ErrorKind::PreconditionFailed => "precondition_failed",
            ErrorKind::Internal => "internal",
        }
    }

    /// HTTP status an HTTP boundary would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::PreconditionFailed => 412,
            ErrorKind::OutOfStock | ErrorKind::InvalidQuantity => 422,
            ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_cover_taxonomy() {
        let p = ProductId::new("p1");
        assert_eq!(CommerceError::ProductNotFound(p.clone()).kind(), ErrorKind::NotFound);
        assert_eq!(
            CommerceError::DuplicateLine {
                buyer_id: BuyerId::new("b1"),
                product_id: p.clone(),
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(CommerceError::LineNotInCart(p).kind(), ErrorKind::PreconditionFailed);
        assert_eq!(CommerceError::InvalidQuantity(0).kind(), ErrorKind::InvalidQuantity);
        assert_eq!(CommerceError::Overflow.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::InvalidInput.status_code(), 400);
        assert_eq!(ErrorKind::OutOfStock.status_code(), 422);
        assert_eq!(ErrorKind::PreconditionFailed.status_code(), 412);
    }

    #[test]
    fn test_message_names_identifier() {
        let err = CommerceError::OutOfStock {
            product_id: ProductId::new("p9"),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for p9: requested 6, available 5"
        );
    }
}
