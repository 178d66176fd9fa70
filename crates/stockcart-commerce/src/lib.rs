//! Cart and inventory consistency engine for StockCart.
//!
//! A buyer collects cart lines against a read-only product catalog. The engine
//! guarantees:
//!
//! - **Uniqueness**: at most one line per (buyer, product)
//! - **Quantity floor**: a line always holds at least one unit
//! - **Stock bound**: a line never asks for more than the stock seen at check time
//!
//! and prices the cart with a fixed 5% order discount.
//!
//! # Example
//!
//! ```rust
//! use stockcart_commerce::prelude::*;
//!
//! let catalog = InMemoryCatalog::from_products([Product::new(
//!     ProductId::new("P1"),
//!     "Trail Shoe",
//!     "Peak",
//!     "footwear",
//!     Money::from_major(100, Currency::USD).unwrap(),
//!     5,
//! )
//! .unwrap()])
//! .unwrap();
//! let service = CartService::new(
//!     catalog,
//!     InMemoryCartStore::new(),
//!     PricingEngine::new(Currency::USD),
//! );
//!
//! let buyer = BuyerId::new("B1");
//! service
//!     .add_item(AddItem::new(buyer.clone(), ProductId::new("P1"), 5).unwrap())
//!     .unwrap();
//!
//! let listing = service.list_with_pricing(&buyer).unwrap();
//! assert_eq!(listing.summary.grand_total.display(), "$475.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod store;

pub use error::{CommerceError, ErrorKind};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{InMemoryCatalog, Product, ProductCatalog};

    // Cart
    pub use crate::cart::{
        AddItem, AddItemPayload, CartLine, CartListing, CartService, OrderSummary, PricedLine,
        PricingEngine, QuantityAction, RemoveItem, UpdateQuantity, UpdateQuantityPayload,
    };

    // Store
    pub use crate::store::{CartSnapshot, CartStore, InMemoryCartStore, JoinedLine};
}
