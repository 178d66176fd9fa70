//! Product catalog module.
//!
//! The catalog is an external collaborator: the cart engine only looks
//! products up by id to read stock and display attributes.

mod memory;
mod product;

pub use memory::InMemoryCatalog;
pub use product::Product;

use crate::error::CommerceError;
use crate::ids::ProductId;
use std::sync::Arc;

/// Read-only product lookup.
pub trait ProductCatalog: Send + Sync {
    /// Fetch the current snapshot of a product, or `None` if it does not exist.
    fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceError>;
}

impl<T: ProductCatalog + ?Sized> ProductCatalog for Arc<T> {
    fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceError> {
        (**self).find_product(id)
    }
}

impl<T: ProductCatalog + ?Sized> ProductCatalog for &T {
    fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceError> {
        (**self).find_product(id)
    }
}
