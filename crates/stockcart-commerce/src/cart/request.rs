//! Validated operation inputs.
//!
//! Raw payloads mirror the wire shape (camelCase JSON). Each is turned into
//! an immutable request value once, together with the buyer id supplied by
//! the identity layer, and handed to [`CartService`](crate::cart::CartService)
//! by value.

use crate::cart::QuantityAction;
use crate::error::CommerceError;
use crate::ids::{BuyerId, CartLineId, ProductId};
use serde::Deserialize;

/// Body of an add-to-cart request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddItemPayload {
    pub product_id: String,
    pub ordered_quantity: i64,
}

impl AddItemPayload {
    /// Parse from JSON; shape errors are `InvalidInput`.
    pub fn from_json(body: &str) -> Result<Self, CommerceError> {
        serde_json::from_str(body).map_err(|e| CommerceError::InvalidInput(e.to_string()))
    }

    /// Bind to a buyer and validate.
    pub fn validate(self, buyer_id: BuyerId) -> Result<AddItem, CommerceError> {
        AddItem::new(
            buyer_id,
            ProductId::parse(&self.product_id)?,
            self.ordered_quantity,
        )
    }
}

/// Body of a quantity update request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateQuantityPayload {
    pub product_id: String,
    pub action: QuantityAction,
}

impl UpdateQuantityPayload {
    /// Parse from JSON; shape errors are `InvalidInput`.
    pub fn from_json(body: &str) -> Result<Self, CommerceError> {
        serde_json::from_str(body).map_err(|e| CommerceError::InvalidInput(e.to_string()))
    }

    /// Bind to a buyer and validate.
    pub fn validate(self, buyer_id: BuyerId) -> Result<UpdateQuantity, CommerceError> {
        Ok(UpdateQuantity::new(
            buyer_id,
            ProductId::parse(&self.product_id)?,
            self.action,
        ))
    }
}

/// Add `ordered_quantity` units of a product to a buyer's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItem {
    buyer_id: BuyerId,
    product_id: ProductId,
    ordered_quantity: i64,
}

impl AddItem {
    pub fn new(
        buyer_id: BuyerId,
        product_id: ProductId,
        ordered_quantity: i64,
    ) -> Result<Self, CommerceError> {
        if ordered_quantity < 1 {
            return Err(CommerceError::InvalidInput(format!(
                "orderedQuantity must be at least 1, got {ordered_quantity}"
            )));
        }
        Ok(Self {
            buyer_id,
            product_id,
            ordered_quantity,
        })
    }

    pub fn buyer_id(&self) -> &BuyerId {
        &self.buyer_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn ordered_quantity(&self) -> i64 {
        self.ordered_quantity
    }
}

/// Move a line's quantity one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQuantity {
    buyer_id: BuyerId,
    product_id: ProductId,
    action: QuantityAction,
}

impl UpdateQuantity {
    pub fn new(buyer_id: BuyerId, product_id: ProductId, action: QuantityAction) -> Self {
        Self {
            buyer_id,
            product_id,
            action,
        }
    }

    pub fn buyer_id(&self) -> &BuyerId {
        &self.buyer_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn action(&self) -> QuantityAction {
        self.action
    }
}

/// Delete one of the buyer's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveItem {
    buyer_id: BuyerId,
    line_id: CartLineId,
}

impl RemoveItem {
    pub fn new(buyer_id: BuyerId, line_id: CartLineId) -> Self {
        Self { buyer_id, line_id }
    }

    /// Validate a raw line id from the path.
    pub fn parse(buyer_id: BuyerId, raw_line_id: &str) -> Result<Self, CommerceError> {
        Ok(Self::new(buyer_id, CartLineId::parse(raw_line_id)?))
    }

    pub fn buyer_id(&self) -> &BuyerId {
        &self.buyer_id
    }

    pub fn line_id(&self) -> &CartLineId {
        &self.line_id
    }
}
