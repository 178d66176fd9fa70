//! Product snapshot as seen by the cart engine.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// The catalog owns products; the cart engine only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Category label.
    pub category: String,
    /// Unit price.
    pub price: Money,
    /// Units currently available.
    pub stock_quantity: i64,
    /// Image URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Create a product, rejecting negative price or stock.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        price: Money,
        stock_quantity: i64,
    ) -> Result<Self, CommerceError> {
        let product = Self {
            id,
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            price,
            stock_quantity,
            image: None,
        };
        product.validate()?;
        Ok(product)
    }

    /// Set the image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Check the catalog-side invariants (non-negative price and stock).
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.price.is_negative() {
            return Err(CommerceError::InvalidInput(format!(
                "product {} has a negative price",
                self.id
            )));
        }
        if self.stock_quantity < 0 {
            return Err(CommerceError::InvalidInput(format!(
                "product {} has negative stock",
                self.id
            )));
        }
        Ok(())
    }

    /// Check if a specific quantity is covered by current stock.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.stock_quantity
    }

    /// Reject `requested` if it exceeds current stock.
    pub fn ensure_stock(&self, requested: i64) -> Result<(), CommerceError> {
        if self.can_fulfill(requested) {
            Ok(())
        } else {
            Err(CommerceError::OutOfStock {
                product_id: self.id.clone(),
                requested,
                available: self.stock_quantity,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn product(stock: i64) -> Product {
        Product::new(
            ProductId::new("p1"),
            "Trail Shoe",
            "Peak",
            "footwear",
            Money::new(10_000, Currency::USD),
            stock,
        )
        .unwrap()
    }

    #[test]
    fn test_product_creation() {
        let p = product(5).with_image("https://img.example/p1.png");
        assert_eq!(p.name, "Trail Shoe");
        assert_eq!(p.image.as_deref(), Some("https://img.example/p1.png"));
    }

    #[test]
    fn test_rejects_negative_values() {
        assert!(Product::new(
            ProductId::new("p1"),
            "n",
            "b",
            "c",
            Money::new(-1, Currency::USD),
            1
        )
        .is_err());
        assert!(Product::new(
            ProductId::new("p1"),
            "n",
            "b",
            "c",
            Money::new(1, Currency::USD),
            -1
        )
        .is_err());
    }

    #[test]
    fn test_stock_bound() {
        let p = product(5);
        assert!(p.can_fulfill(5));
        assert!(!p.can_fulfill(6));
        assert!(p.ensure_stock(5).is_ok());
        assert_eq!(
            p.ensure_stock(6),
            Err(CommerceError::OutOfStock {
                product_id: ProductId::new("p1"),
                requested: 6,
                available: 5,
            })
        );
    }

    #[test]
    fn test_zero_stock() {
        let p = product(0);
        assert!(!p.can_fulfill(1));
        assert!(p.ensure_stock(1).is_err());
    }
}
