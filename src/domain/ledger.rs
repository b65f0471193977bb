use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{Amount, InventoryItem, ItemId, NewItem};

/// Column schema of the inventory table, in persisted order.
pub const COLUMNS: [&str; 10] = [
    "id",
    "name",
    "description",
    "buying_price",
    "shipping_price",
    "conversion_rate",
    "profit_margin",
    "quantity",
    "sold",
    "total_profit",
];

/// The inventory table. Rows are kept in insertion order.
///
/// Operations here never touch storage: callers load a table, apply one
/// operation and persist the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

/// Outcome of a successful sale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub item_id: ItemId,
    pub quantity: u32,
    /// Profit per unit at the item's pricing when the sale happened
    pub unit_profit: Amount,
    /// `unit_profit * quantity`, already added to the item's total
    pub profit: Amount,
    /// Units left in stock after the sale
    pub remaining: u32,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows read back from storage, keeping their order.
    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<InventoryItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Sum of accumulated profit across every row.
    pub fn total_profit(&self) -> Amount {
        self.items.iter().map(|item| item.total_profit).sum()
    }

    /// Append a new item with a freshly generated id and zeroed sale totals.
    pub fn add(&mut self, new_item: NewItem) -> &InventoryItem {
        let mut id = Uuid::new_v4();
        while self.contains(id) {
            id = Uuid::new_v4();
        }

        self.items.push(InventoryItem::from_new(id, new_item));
        &self.items[self.items.len() - 1]
    }

    /// Sell `quantity` units of an item.
    ///
    /// Either the whole sale applies (stock decremented, `sold` and
    /// `total_profit` incremented) or nothing changes. Profit is computed from
    /// the item's current pricing fields.
    pub fn sell(&mut self, id: ItemId, quantity: u32) -> Result<Sale, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity);
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        if quantity > item.quantity {
            return Err(LedgerError::InsufficientStock {
                id,
                available: item.quantity,
                requested: quantity,
            });
        }

        let unit_profit = item.unit_profit();
        let profit = unit_profit * f64::from(quantity);
        let total_profit = item.total_profit + profit;
        if !total_profit.is_finite() {
            return Err(LedgerError::ProfitOverflow { id });
        }

        item.quantity -= quantity;
        item.sold += quantity;
        item.total_profit = total_profit;

        Ok(Sale {
            item_id: id,
            quantity,
            unit_profit,
            profit,
            remaining: item.quantity,
        })
    }

    /// Remove an item. Deleting an id that isn't present is a no-op.
    pub fn delete(&mut self, id: ItemId) -> Option<InventoryItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Drop every row. Returns how many rows were removed.
    pub fn reset(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Insufficient stock for item {id}: available {available}, requested {requested}")]
    InsufficientStock {
        id: ItemId,
        available: u32,
        requested: u32,
    },

    #[error("Quantity to sell must be at least 1")]
    InvalidQuantity,

    #[error("Sale would overflow the accumulated profit of item {id}")]
    ProfitOverflow { id: ItemId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemState, Pricing};

    const EPSILON: f64 = 1e-6;

    fn reference_item(quantity: u32) -> NewItem {
        NewItem::new(
            "Alternator",
            Pricing::new(100.0, 20.0, 280.0, 20.0).unwrap(),
            quantity,
        )
    }

    #[test]
    fn test_add_assigns_id_and_zeroes_totals() {
        let mut inventory = Inventory::new();
        let item = inventory.add(reference_item(5)).clone();

        assert_eq!(inventory.len(), 1);
        assert_eq!(item.sold, 0);
        assert_eq!(item.total_profit, 0.0);
        assert_eq!(item.quantity, 5);
        assert_eq!(inventory.get(item.id), Some(&item));
    }

    #[test]
    fn test_identical_items_get_distinct_ids_in_insertion_order() {
        let mut inventory = Inventory::new();
        let first = inventory.add(reference_item(1)).id;
        let second = inventory.add(reference_item(1)).id;

        assert_ne!(first, second);
        let ids: Vec<ItemId> = inventory.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_reference_sale_scenario() {
        let mut inventory = Inventory::new();
        let id = inventory.add(reference_item(5)).id;

        let sale = inventory.sell(id, 2).unwrap();
        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.remaining, 3);
        assert!((sale.unit_profit - 6720.0).abs() < EPSILON);
        assert!((sale.profit - 13440.0).abs() < EPSILON);

        let item = inventory.get(id).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.sold, 2);
        assert!((item.total_profit - 13440.0).abs() < EPSILON);

        let before = inventory.clone();
        let err = inventory.sell(id, 10).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                id,
                available: 3,
                requested: 10
            }
        );
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_sell_unknown_id_is_not_found() {
        let mut inventory = Inventory::new();
        inventory.add(reference_item(5));
        let before = inventory.clone();

        let missing = Uuid::new_v4();
        assert_eq!(
            inventory.sell(missing, 1),
            Err(LedgerError::NotFound(missing))
        );
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_sell_zero_is_rejected() {
        let mut inventory = Inventory::new();
        let id = inventory.add(reference_item(5)).id;
        assert_eq!(inventory.sell(id, 0), Err(LedgerError::InvalidQuantity));
        assert_eq!(inventory.get(id).unwrap().quantity, 5);
    }

    #[test]
    fn test_selling_out_depletes_but_keeps_item() {
        let mut inventory = Inventory::new();
        let id = inventory.add(reference_item(2)).id;

        inventory.sell(id, 2).unwrap();
        let item = inventory.get(id).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.state(), ItemState::Depleted);

        assert!(matches!(
            inventory.sell(id, 1),
            Err(LedgerError::InsufficientStock { available: 0, .. })
        ));
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_price_edit_only_affects_later_sales() {
        let mut inventory = Inventory::new();
        let id = inventory.add(reference_item(5)).id;
        inventory.sell(id, 1).unwrap();

        // Raising the margin changes future unit profit only
        inventory.items[0].profit_margin = 50.0;
        let sale = inventory.sell(id, 1).unwrap();

        assert!((sale.unit_profit - 16800.0).abs() < EPSILON);
        let item = inventory.get(id).unwrap();
        assert!((item.total_profit - (6720.0 + 16800.0)).abs() < EPSILON);
    }

    #[test]
    fn test_sale_overflowing_profit_leaves_table_unchanged() {
        let mut inventory = Inventory::new();
        let pricing = Pricing::new(1e300, 0.0, 1.0, 100.0).unwrap();
        let id = inventory.add(NewItem::new("Turbine", pricing, u32::MAX)).id;
        let before = inventory.clone();

        // 1e300 per unit times u32::MAX units is not representable
        assert_eq!(
            inventory.sell(id, u32::MAX),
            Err(LedgerError::ProfitOverflow { id })
        );
        assert_eq!(inventory, before);

        // A finite sale on top of a near-limit total overflows as well
        inventory.items[0].total_profit = f64::MAX;
        let before = inventory.clone();
        assert_eq!(
            inventory.sell(id, 1),
            Err(LedgerError::ProfitOverflow { id })
        );
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_duplicate_ids_sell_first_match_only() {
        let mut inventory = Inventory::new();
        let id = inventory.add(reference_item(5)).id;
        let mut twin = inventory.items[0].clone();
        twin.quantity = 1;
        inventory.items.push(twin);

        inventory.sell(id, 3).unwrap();
        assert_eq!(inventory.items[0].quantity, 2);
        assert_eq!(inventory.items[1].quantity, 1);
    }

    #[test]
    fn test_delete_removes_and_keeps_order() {
        let mut inventory = Inventory::new();
        let a = inventory.add(reference_item(1)).id;
        let b = inventory.add(reference_item(1)).id;
        let c = inventory.add(reference_item(1)).id;

        let removed = inventory.delete(b).unwrap();
        assert_eq!(removed.id, b);

        let ids: Vec<ItemId> = inventory.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut inventory = Inventory::new();
        inventory.add(reference_item(1));
        let before = inventory.clone();

        assert_eq!(inventory.delete(Uuid::new_v4()), None);
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_reset_clears_rows_but_keeps_schema() {
        let mut inventory = Inventory::new();
        let id = inventory.add(reference_item(3)).id;
        inventory.add(reference_item(2));
        inventory.sell(id, 1).unwrap();

        assert_eq!(inventory.reset(), 2);
        assert!(inventory.is_empty());
        assert_eq!(inventory.columns(), &COLUMNS);
        assert_eq!(inventory.columns().len(), 10);
        assert_eq!(inventory.total_profit(), 0.0);
    }

    #[test]
    fn test_total_profit_sums_rows() {
        let mut inventory = Inventory::new();
        let a = inventory.add(reference_item(5)).id;
        let b = inventory.add(reference_item(5)).id;
        inventory.sell(a, 2).unwrap();
        inventory.sell(b, 1).unwrap();

        assert!((inventory.total_profit() - 3.0 * 6720.0).abs() < EPSILON);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn pricing_strategy() -> impl Strategy<Value = Pricing> {
            (0.0..10_000.0f64, 0.0..1_000.0f64, 0.01..500.0f64, 0.0..200.0f64).prop_map(
                |(buying, shipping, rate, margin)| {
                    Pricing::new(buying, shipping, rate, margin).unwrap()
                },
            )
        }

        proptest! {
            /// Selling price minus base cost is always the unit profit.
            #[test]
            fn unit_profit_identity(pricing in pricing_strategy()) {
                let diff = pricing.selling_price() - pricing.base_cost();
                let tolerance = 1e-9 * pricing.selling_price().abs().max(1.0);
                prop_assert!((diff - pricing.unit_profit()).abs() <= tolerance);
            }

            /// A sale within stock moves exactly k units and k * unit_profit.
            #[test]
            fn sale_within_stock_is_exact(
                pricing in pricing_strategy(),
                stock in 1u32..1_000,
                fraction in 0.0..1.0f64,
            ) {
                let k = ((f64::from(stock) * fraction) as u32).clamp(1, stock);
                let mut inventory = Inventory::new();
                let id = inventory.add(NewItem::new("part", pricing, stock)).id;

                let sale = inventory.sell(id, k).unwrap();
                let item = inventory.get(id).unwrap();

                prop_assert_eq!(item.quantity, stock - k);
                prop_assert_eq!(item.sold, k);
                prop_assert_eq!(item.total_profit, pricing.unit_profit() * f64::from(k));
                prop_assert_eq!(sale.profit, item.total_profit);
            }

            /// Selling more than is in stock never changes the table.
            #[test]
            fn oversell_leaves_table_unchanged(
                pricing in pricing_strategy(),
                stock in 0u32..100,
                extra in 1u32..100,
            ) {
                let mut inventory = Inventory::new();
                let id = inventory.add(NewItem::new("part", pricing, stock)).id;
                let before = inventory.clone();

                let result = inventory.sell(id, stock + extra);
                prop_assert_eq!(
                    result,
                    Err(LedgerError::InsufficientStock { id, available: stock, requested: stock + extra })
                );
                prop_assert_eq!(inventory, before);
            }

            /// Ids stay unique no matter how many identical items are added.
            #[test]
            fn ids_stay_unique(pricing in pricing_strategy(), count in 1usize..50) {
                let mut inventory = Inventory::new();
                for _ in 0..count {
                    inventory.add(NewItem::new("same", pricing, 1));
                }
                let mut ids: Vec<ItemId> = inventory.items().iter().map(|i| i.id).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), count);
            }
        }
    }
}
