use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Inventory, InventoryItem, ItemId, NewItem, PartnerShare, Sale};
use crate::storage::{Store, StoreConfig};

use super::{AppError, ProfitSummary};

/// Application service providing high-level operations on the inventory ledger.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every mutating call is one full round trip: load the table, apply a single
/// ledger operation, save the result. Nothing is saved when the operation fails.
pub struct LedgerService {
    store: Store,
}

/// Result of selling units of an item
#[derive(Debug, Clone)]
pub struct SaleResult {
    pub sale: Sale,
    /// The item as it stands after the sale
    pub item: InventoryItem,
}

impl LedgerService {
    /// Create a new ledger service on top of an opened store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Open the configured store, creating an empty inventory if none exists.
    pub async fn open(config: &StoreConfig) -> Result<Self, AppError> {
        let store = Store::open(config).await?;
        info!(backend = %config.backend, path = %config.path.display(), "opened inventory store");
        Ok(Self::new(store))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ========================
    // Ledger operations
    // ========================

    /// Add a new item to the inventory.
    pub async fn add_item(&self, new_item: NewItem) -> Result<InventoryItem, AppError> {
        let mut inventory = self.store.load().await?;
        let item = inventory.add(new_item).clone();
        self.store.save(&inventory).await?;

        info!(id = %item.id, name = %item.name, quantity = item.quantity, "added item");
        Ok(item)
    }

    /// Sell units of an item. Rejects the whole sale if stock is short.
    pub async fn sell(&self, id: ItemId, quantity: u32) -> Result<SaleResult, AppError> {
        let mut inventory = self.store.load().await?;

        let sale = match inventory.sell(id, quantity) {
            Ok(sale) => sale,
            Err(e) => {
                warn!(%id, quantity, error = %e, "sale rejected");
                return Err(e.into());
            }
        };
        self.store.save(&inventory).await?;

        let item = inventory
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))?;

        info!(
            %id,
            quantity = sale.quantity,
            profit = sale.profit,
            remaining = sale.remaining,
            "sold units"
        );
        Ok(SaleResult { sale, item })
    }

    /// Delete an item. Returns `None` without touching storage when the id is
    /// not in the inventory.
    pub async fn delete_item(&self, id: ItemId) -> Result<Option<InventoryItem>, AppError> {
        let mut inventory = self.store.load().await?;
        let Some(removed) = inventory.delete(id) else {
            info!(%id, "delete skipped, item not present");
            return Ok(None);
        };
        self.store.save(&inventory).await?;

        info!(%id, name = %removed.name, "deleted item");
        Ok(Some(removed))
    }

    /// Remove every item. Returns the number of rows removed.
    pub async fn reset(&self) -> Result<usize, AppError> {
        let mut inventory = self.store.load().await?;
        let removed = inventory.reset();
        self.store.save(&inventory).await?;

        warn!(removed, "inventory reset");
        Ok(removed)
    }

    // ========================
    // Queries
    // ========================

    /// Current inventory table.
    pub async fn snapshot(&self) -> Result<Inventory, AppError> {
        Ok(self.store.load().await?)
    }

    /// List items in table order, optionally only those with stock left.
    pub async fn list_items(&self, in_stock_only: bool) -> Result<Vec<InventoryItem>, AppError> {
        let inventory = self.store.load().await?;
        Ok(inventory
            .into_items()
            .into_iter()
            .filter(|item| !in_stock_only || item.quantity > 0)
            .collect())
    }

    /// Get a single item by id.
    pub async fn get_item(&self, id: ItemId) -> Result<InventoryItem, AppError> {
        self.store
            .load()
            .await?
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))
    }

    /// Resolve a full item id or a unique prefix of one (ids are shown
    /// shortened in listings). Returns `None` when nothing matches.
    pub async fn resolve_id(&self, reference: &str) -> Result<Option<ItemId>, AppError> {
        let reference = reference.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&reference) {
            return Ok(Some(id));
        }
        if reference.is_empty() {
            return Ok(None);
        }

        let inventory = self.store.load().await?;
        let mut matches = inventory
            .items()
            .iter()
            .map(|item| item.id)
            .filter(|id| id.to_string().starts_with(&reference));

        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(Some(id)),
            (Some(_), Some(_)) => Err(AppError::AmbiguousItemId(reference.clone())),
            (None, _) => Ok(None),
        }
    }

    /// Total profit and the partner split, overall and per item.
    pub async fn profit_summary(&self, share: PartnerShare) -> Result<ProfitSummary, AppError> {
        let inventory = self.store.load().await?;
        Ok(ProfitSummary::build(&inventory, share))
    }
}
