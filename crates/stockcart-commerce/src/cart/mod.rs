//! Shopping cart module.
//!
//! Contains cart lines, validated requests, pricing and the service that
//! enforces cart invariants.

mod line;
mod listing;
mod pricing;
mod request;
mod service;

pub use line::{CartLine, QuantityAction};
pub use listing::{CartListing, PricedLine};
pub use pricing::{OrderSummary, PricingEngine, ORDER_DISCOUNT_BPS};
pub use request::{
    AddItem, AddItemPayload, RemoveItem, UpdateQuantity, UpdateQuantityPayload,
};
pub use service::CartService;
