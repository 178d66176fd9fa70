//! Lock-guarded in-process cart store with serializable snapshots.

use crate::cart::CartLine;
use crate::error::CommerceError;
use crate::ids::{BuyerId, CartLineId, ProductId};
use crate::store::CartStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Serializable copy of every line in a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartSnapshot {
    /// Lines grouped by buyer (buyers in id order), oldest first within a buyer.
    pub lines: Vec<CartLine>,
}

/// Cart store keeping lines in memory.
///
/// Every operation runs under one lock acquisition, which makes the
/// conditional writes atomic.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<BuyerId, Vec<CartLine>>>,
}

impl InMemoryCartStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot.
    ///
    /// Rejects snapshots holding two lines for one (buyer, product), a
    /// repeated line id or a quantity below 1.
    pub fn from_snapshot(snapshot: CartSnapshot) -> Result<Self, CommerceError> {
        let store = Self::new();
        let mut seen_ids = HashSet::new();
        for line in snapshot.lines {
            if !seen_ids.insert(line.id.clone()) {
                return Err(CommerceError::Store(format!(
                    "snapshot line id {} appears more than once",
                    line.id
                )));
            }
            if line.ordered_quantity < 1 {
                return Err(CommerceError::Store(format!(
                    "snapshot line {} has quantity {}",
                    line.id, line.ordered_quantity
                )));
            }
            let id = line.id.clone();
            store.insert_line(line).map_err(|e| match e {
                CommerceError::DuplicateLine { .. } => {
                    CommerceError::Store(format!("snapshot line {id} duplicates another line"))
                }
                other => other,
            })?;
        }
        Ok(store)
    }

    /// Copy out every line.
    pub fn snapshot(&self) -> Result<CartSnapshot, CommerceError> {
        let carts = self.read()?;
        let mut buyers: Vec<&BuyerId> = carts.keys().collect();
        buyers.sort();
        let lines = buyers
            .into_iter()
            .flat_map(|buyer| carts[buyer].iter().cloned())
            .collect();
        Ok(CartSnapshot { lines })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<BuyerId, Vec<CartLine>>>, CommerceError> {
        self.carts
            .read()
            .map_err(|_| CommerceError::Store("cart store lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<BuyerId, Vec<CartLine>>>, CommerceError> {
        self.carts
            .write()
            .map_err(|_| CommerceError::Store("cart store lock poisoned".to_string()))
    }
}

impl CartStore for InMemoryCartStore {
    fn find_line(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
    ) -> Result<Option<CartLine>, CommerceError> {
        Ok(self.read()?.get(buyer_id).and_then(|lines| {
            lines
                .iter()
                .find(|l| &l.product_id == product_id)
                .cloned()
        }))
    }

    fn insert_line(&self, line: CartLine) -> Result<(), CommerceError> {
        let mut carts = self.write()?;
        let lines = carts.entry(line.buyer_id.clone()).or_default();
        if lines.iter().any(|l| l.product_id == line.product_id) {
            return Err(CommerceError::DuplicateLine {
                buyer_id: line.buyer_id,
                product_id: line.product_id,
            });
        }
        lines.push(line);
        Ok(())
    }

    fn compare_and_set_quantity(
        &self,
        buyer_id: &BuyerId,
        product_id: &ProductId,
        expected: i64,
        new: i64,
    ) -> Result<bool, CommerceError> {
        if new < 1 {
            return Err(CommerceError::InvalidQuantity(new));
        }
        let mut carts = self.write()?;
        let line = carts
            .get_mut(buyer_id)
            .and_then(|lines| lines.iter_mut().find(|l| &l.product_id == product_id));
        match line {
            Some(line) if line.ordered_quantity == expected => {
                line.ordered_quantity = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete_line(
        &self,
        buyer_id: &BuyerId,
        line_id: &CartLineId,
    ) -> Result<bool, CommerceError> {
        let mut carts = self.write()?;
        let Some(lines) = carts.get_mut(buyer_id) else {
            return Ok(false);
        };
        let len_before = lines.len();
        lines.retain(|l| &l.id != line_id);
        let removed = lines.len() < len_before;
        if lines.is_empty() {
            carts.remove(buyer_id);
        }
        Ok(removed)
    }

    fn delete_all(&self, buyer_id: &BuyerId) -> Result<usize, CommerceError> {
        Ok(self
            .write()?
            .remove(buyer_id)
            .map(|lines| lines.len())
            .unwrap_or(0))
    }

    fn lines_for(&self, buyer_id: &BuyerId) -> Result<Vec<CartLine>, CommerceError> {
        Ok(self.read()?.get(buyer_id).cloned().unwrap_or_default())
    }

    fn count_lines(&self, buyer_id: &BuyerId) -> Result<usize, CommerceError> {
        Ok(self.read()?.get(buyer_id).map_or(0, Vec::len))
    }
}
