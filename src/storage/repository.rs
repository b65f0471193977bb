use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Inventory, InventoryItem};

use super::MIGRATION_001_INITIAL;

/// SQLite-backed store for the inventory table.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Create the inventory table if it doesn't exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Open the database file at `path`, creating it and its schema if missing.
    pub async fn open(path: &str) -> Result<Self> {
        let repo = Self::connect(&format!("sqlite:{}?mode=rwc", path)).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Read the whole inventory table in insertion order.
    /// A fresh database yields an empty table.
    pub async fn load(&self) -> Result<Inventory> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, buying_price, shipping_price, conversion_rate, profit_margin, quantity, sold, total_profit
            FROM inventory
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load inventory")?;

        let items = rows
            .iter()
            .map(Self::row_to_item)
            .collect::<Result<Vec<_>>>()?;

        debug!(rows = items.len(), "loaded inventory from sqlite");
        Ok(Inventory::from_items(items))
    }

    /// Replace the stored table with `inventory`.
    /// Runs in a single transaction, so readers see either the old or the new table.
    pub async fn save(&self, inventory: &Inventory) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM inventory")
            .execute(&mut *tx)
            .await
            .context("Failed to clear inventory")?;

        for item in inventory.items() {
            sqlx::query(
                r#"
                INSERT INTO inventory (id, name, description, buying_price, shipping_price, conversion_rate, profit_margin, quantity, sold, total_profit)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id.to_string())
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.buying_price)
            .bind(item.shipping_price)
            .bind(item.conversion_rate)
            .bind(item.profit_margin)
            .bind(i64::from(item.quantity))
            .bind(i64::from(item.sold))
            .bind(item.total_profit)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to save item {}", item.id))?;
        }

        tx.commit().await.context("Failed to commit inventory")?;

        debug!(rows = inventory.len(), "saved inventory to sqlite");
        Ok(())
    }

    fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<InventoryItem> {
        let id_str: String = row.get("id");
        let quantity: i64 = row.get("quantity");
        let sold: i64 = row.get("sold");

        let item = InventoryItem {
            id: Uuid::parse_str(&id_str).context("Invalid item ID")?,
            name: row.get("name"),
            description: row.get("description"),
            buying_price: row.get("buying_price"),
            shipping_price: row.get("shipping_price"),
            conversion_rate: row.get("conversion_rate"),
            profit_margin: row.get("profit_margin"),
            quantity: u32::try_from(quantity)
                .with_context(|| format!("Invalid quantity for item {}", id_str))?,
            sold: u32::try_from(sold)
                .with_context(|| format!("Invalid sold count for item {}", id_str))?,
            total_profit: row.get("total_profit"),
        };

        item.validate()
            .with_context(|| format!("Invalid pricing for item {}", id_str))?;
        Ok(item)
    }
}
