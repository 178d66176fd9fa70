//! In-process catalog, used by the CLI and by tests.

use crate::catalog::{Product, ProductCatalog};
use crate::error::CommerceError;
use crate::ids::ProductId;
use std::collections::HashMap;
use std::sync::RwLock;

/// Catalog backed by a map.
///
/// `upsert` and `remove` exist for fixtures; the cart engine never calls them.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from products, validating each one.
    pub fn from_products(
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self, CommerceError> {
        let mut map = HashMap::new();
        for product in products {
            product.validate()?;
            if map.contains_key(&product.id) {
                return Err(CommerceError::InvalidInput(format!(
                    "duplicate product id {} in catalog",
                    product.id
                )));
            }
            map.insert(product.id.clone(), product);
        }
        Ok(Self {
            products: RwLock::new(map),
        })
    }

    /// Insert or replace a product.
    pub fn upsert(&self, product: Product) -> Result<(), CommerceError> {
        product.validate()?;
        self.write()?.insert(product.id.clone(), product);
        Ok(())
    }

    /// Remove a product, returning it if it existed.
    pub fn remove(&self, id: &ProductId) -> Result<Option<Product>, CommerceError> {
        Ok(self.write()?.remove(id))
    }

    /// All products, ordered by id.
    pub fn products(&self) -> Result<Vec<Product>, CommerceError> {
        let mut products: Vec<Product> = self.read()?.values().cloned().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<ProductId, Product>>, CommerceError> {
        self.products
            .read()
            .map_err(|_| CommerceError::Store("catalog lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<ProductId, Product>>, CommerceError> {
        self.products
            .write()
            .map_err(|_| CommerceError::Store("catalog lock poisoned".to_string()))
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceError> {
        Ok(self.read()?.get(id).cloned())
    }
}
