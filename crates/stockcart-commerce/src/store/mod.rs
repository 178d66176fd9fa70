//! Cart line persistence.
//!
//! Writes that depend on current state are exposed as single conditional
//! operations (`insert_line`, `compare_and_set_quantity`, `delete_line`) so
//! callers never compose a read and a write themselves.

mod memory;

pub use memory::{CartSnapshot, InMemoryCartStore};

use crate::cart::CartLine;
use crate::catalog::{Product, ProductCatalog};
use crate::error::CommerceError;
use crate::ids::{BuyerId, CartLineId, ProductId};
use std::sync::Arc;

/// A cart line with the catalog's current view of its product.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedLine {
    pub line: CartLine,
    /// `None` when the product has left the catalog.
    pub product: Option<Product>,
}

/// Storage for cart lines, unique per (buyer, product).
pub trait CartStore: Send + Sync {
    /// Point lookup by (buyer, product).
    fn find_line(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
    ) -> Result<Option<CartLine>, CommerceError>;

    /// Existence check by (buyer, product).
    fn contains_line(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
    ) -> Result<bool, CommerceError> {
        Ok(self.find_line(buyer_id, product_id)?.is_some())
    }

    /// Insert a line unless one already exists for its (buyer, product).
    ///
    /// Fails with `DuplicateLine` when it does. Check and insert are atomic.
    fn insert_line(&self, line: CartLine) -> Result<(), CommerceError>;

    /// Set the quantity of the (buyer, product) line to `new` if it is
    /// currently `expected`.
    ///
    /// Returns `false` without writing when the line is missing or its
    /// quantity differs.
    fn compare_and_set_quantity(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
        expected: i64,
        new: i64,
    ) -> Result<bool, CommerceError>;

    /// Delete the line with `line_id` if it belongs to `buyer_id`.
    ///
    /// Returns whether a line was removed.
    fn delete_line(&self, buyer_id: &BuyerId, line_id: &CartLineId)
        -> Result<bool, CommerceError>;

    /// Delete every line of `buyer_id`, returning how many were removed.
    fn delete_all(&self, buyer_id: &BuyerId) -> Result<usize, CommerceError>;

    /// All lines of `buyer_id`, oldest first.
    fn lines_for(&self, buyer_id: &BuyerId) -> Result<Vec<CartLine>, CommerceError>;

    /// Number of lines held by `buyer_id`.
    fn count_lines(&self, buyer_id: &BuyerId) -> Result<usize, CommerceError> {
        Ok(self.lines_for(buyer_id)?.len())
    }

    /// Lines of `buyer_id` joined with their products, oldest first.
    fn list_joined(
        &self,
        buyer_id: &BuyerId,
        catalog: &dyn ProductCatalog,
    ) -> Result<Vec<JoinedLine>, CommerceError> {
        self.lines_for(buyer_id)?
            .into_iter()
            .map(|line| {
                let product = catalog.find_product(&line.product_id)?;
                Ok(JoinedLine { line, product })
            })
            .collect()
    }
}

impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    fn find_line(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
    ) -> Result<Option<CartLine>, CommerceError> {
        (**self).find_line(buyer_id, product_id)
    }

    fn contains_line(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
    ) -> Result<bool, CommerceError> {
        (**self).contains_line(buyer_id, product_id)
    }

    fn insert_line(&self, line: CartLine) -> Result<(), CommerceError> {
        (**self).insert_line(line)
    }

    fn compare_and_set_quantity(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
        expected: i64,
        new: i64,
    ) -> Result<bool, CommerceError> {
        (**self).compare_and_set_quantity(buyer_id, product_id, expected, new)
    }

    fn delete_line(
        &self,
        buyer_id: &BuyerId,
        line_id: &CartLineId,
    ) -> Result<bool, CommerceError> {
        (**self).delete_line(buyer_id, line_id)
    }

    fn delete_all(&self, buyer_id: &BuyerId) -> Result<usize, CommerceError> {
        (**self).delete_all(buyer_id)
    }

    fn lines_for(&self, buyer_id: &BuyerId) -> Result<Vec<CartLine>, CommerceError> {
        (**self).lines_for(buyer_id)
    }

    fn count_lines(&self, buyer_id: &BuyerId) -> Result<usize, CommerceError> {
        (**self).count_lines(buyer_id)
    }
}
