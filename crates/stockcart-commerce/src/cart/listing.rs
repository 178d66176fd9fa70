//! Cart listing joined with product snapshots.

use crate::cart::{CartLine, OrderSummary};
use crate::catalog::Product;
use crate::ids::{CartLineId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A cart line enriched with its product's current display attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedLine {
    pub line_id: CartLineId,
    pub product_id: ProductId,
    pub ordered_quantity: i64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `price * ordered_quantity`.
    pub line_total: Money,
}

impl PricedLine {
    pub(crate) fn new(line: CartLine, product: Product, line_total: Money) -> Self {
        Self {
            line_id: line.id,
            product_id: line.product_id,
            ordered_quantity: line.ordered_quantity,
            name: product.name,
            brand: product.brand,
            category: product.category,
            price: product.price,
            image: product.image,
            line_total,
        }
    }
}

/// Result of listing a buyer's cart.
///
/// Lines whose product has left the catalog are reported in `unavailable`
/// and contribute nothing to `summary`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartListing {
    /// Priced lines, oldest first.
    pub lines: Vec<PricedLine>,
    /// Lines whose product no longer exists, oldest first.
    pub unavailable: Vec<CartLine>,
    pub summary: OrderSummary,
}

impl CartListing {
    /// Check if there is nothing to show at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.unavailable.is_empty()
    }

    /// Sum of quantities over priced lines.
    pub fn total_units(&self) -> i64 {
        self.lines.iter().map(|l| l.ordered_quantity).sum()
    }
}
