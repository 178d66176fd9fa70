//! Cart business rules.

use crate::cart::{
    AddItem, CartLine, CartListing, PricedLine, PricingEngine, RemoveItem, UpdateQuantity,
};
use crate::catalog::{Product, ProductCatalog};
use crate::error::CommerceError;
use crate::ids::{BuyerId, ProductId};
use crate::store::{CartStore, JoinedLine};
use tracing::{debug, info, warn};

/// Enforces cart invariants in front of a [`CartStore`].
///
/// All checks run before the single store write of an operation, so a failed
/// operation leaves the store untouched.
pub struct CartService<C, S> {
    catalog: C,
    store: S,
    pricing: PricingEngine,
}

impl<C, S> CartService<C, S>
where
    C: ProductCatalog,
    S: CartStore,
{
    pub fn new(catalog: C, store: S, pricing: PricingEngine) -> Self {
        Self {
            catalog,
            store,
            pricing,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a product to the buyer's cart.
    ///
    /// Fails with `ProductNotFound`, `OutOfStock` or `DuplicateLine`.
    pub fn add_item(&self, request: AddItem) -> Result<CartLine, CommerceError> {
        let buyer_id = request.buyer_id();
        let product_id = request.product_id();
        let quantity = request.ordered_quantity();
        debug!(%buyer_id, %product_id, quantity, "add item");

        let product = self.require_product(product_id)?;
        product.ensure_stock(quantity).inspect_err(|_| {
            warn!(%buyer_id, %product_id, quantity, stock = product.stock_quantity, "add rejected: out of stock");
        })?;

        if self.store.contains_line(buyer_id, product_id)? {
            warn!(%buyer_id, %product_id, "add rejected: already in cart");
            return Err(CommerceError::DuplicateLine {
                buyer_id: buyer_id.clone(),
                product_id: product_id.clone(),
            });
        }

        // The store re-checks uniqueness atomically; a concurrent add for the
        // same pair loses here with DuplicateLine.
        let line = CartLine::new(buyer_id.clone(), product_id.clone(), quantity)?;
        self.store.insert_line(line.clone())?;
        info!(%buyer_id, %product_id, line_id = %line.id, quantity, "item added");
        Ok(line)
    }

    /// Move the quantity of an existing line by one and return the new value.
    ///
    /// Fails with `ProductNotFound`, `LineNotInCart`, `OutOfStock`,
    /// `InvalidQuantity` or `ConcurrentModification`.
    pub fn update_quantity(&self, request: UpdateQuantity) -> Result<i64, CommerceError> {
        let buyer_id = request.buyer_id();
        let product_id = request.product_id();
        let action = request.action();
        debug!(%buyer_id, %product_id, %action, "update quantity");

        let product = self.require_product(product_id)?;
        let line = self
            .store
            .find_line(buyer_id, product_id)?
            .ok_or_else(|| CommerceError::LineNotInCart(product_id.clone()))?;

        let current = line.ordered_quantity;
        let new_quantity = action.apply(current)?;
        product.ensure_stock(new_quantity).inspect_err(|_| {
            warn!(%buyer_id, %product_id, new_quantity, stock = product.stock_quantity, "update rejected: out of stock");
        })?;
        if new_quantity < 1 {
            warn!(%buyer_id, %product_id, "update rejected: quantity floor");
            return Err(CommerceError::InvalidQuantity(new_quantity));
        }

        if !self
            .store
            .compare_and_set_quantity(buyer_id, product_id, current, new_quantity)?
        {
            // Lost to a concurrent writer: a deleted line is a missing
            // precondition, anything else is a conflict.
            if self.store.find_line(buyer_id, product_id)?.is_none() {
                warn!(%buyer_id, %product_id, "update lost a race: line removed");
                return Err(CommerceError::LineNotInCart(product_id.clone()));
            }
            warn!(%buyer_id, %product_id, "update lost a race");
            return Err(CommerceError::ConcurrentModification {
                product_id: product_id.clone(),
            });
        }
        info!(%buyer_id, %product_id, from = current, to = new_quantity, "quantity updated");
        Ok(new_quantity)
    }

    /// Remove one of the buyer's lines.
    ///
    /// Removing a missing or foreign line succeeds and returns `false`.
    pub fn remove_item(&self, request: RemoveItem) -> Result<bool, CommerceError> {
        let removed = self
            .store
            .delete_line(request.buyer_id(), request.line_id())?;
        info!(
            buyer_id = %request.buyer_id(),
            line_id = %request.line_id(),
            removed,
            "remove item"
        );
        Ok(removed)
    }

    /// Remove every line of the buyer, returning how many there were.
    pub fn flush(&self, buyer_id: &BuyerId) -> Result<usize, CommerceError> {
        let removed = self.store.delete_all(buyer_id)?;
        info!(%buyer_id, removed, "cart flushed");
        Ok(removed)
    }

    /// Number of lines in the buyer's cart.
    pub fn count(&self, buyer_id: &BuyerId) -> Result<usize, CommerceError> {
        self.store.count_lines(buyer_id)
    }

    /// Lines joined with current product data, plus the order summary.
    pub fn list_with_pricing(&self, buyer_id: &BuyerId) -> Result<CartListing, CommerceError> {
        let joined = self.store.list_joined(buyer_id, &self.catalog)?;

        let mut lines = Vec::with_capacity(joined.len());
        let mut unavailable = Vec::new();
        for JoinedLine { line, product } in joined {
            match product {
                Some(product) => {
                    let total = self.pricing.line_total(product.price, line.ordered_quantity)?;
                    lines.push(PricedLine::new(line, product, total));
                }
                None => {
                    warn!(%buyer_id, product_id = %line.product_id, "cart line references a missing product");
                    unavailable.push(line);
                }
            }
        }

        let summary = self
            .pricing
            .summarize(lines.iter().map(|l| (l.price, l.ordered_quantity)))?;
        debug!(%buyer_id, lines = lines.len(), unavailable = unavailable.len(), "cart listed");
        Ok(CartListing {
            lines,
            unavailable,
            summary,
        })
    }

    fn require_product(&self, product_id: &ProductId) -> Result<Product, CommerceError> {
        self.catalog
            .find_product(product_id)?
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.clone()))
    }
}
