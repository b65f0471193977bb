use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Amount, COLUMNS, InventoryItem};

/// Full inventory snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub columns: Vec<String>,
    pub items: Vec<InventoryItem>,
    pub total_profit: Amount,
}

/// Exporter for converting the inventory to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export the inventory table to CSV, header row first
    pub async fn export_inventory_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let inventory = self.service.snapshot().await?;
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(COLUMNS)?;
        for item in inventory.items() {
            csv_writer.serialize(item)?;
        }

        csv_writer.flush()?;
        Ok(inventory.len())
    }

    /// Export the whole inventory as a pretty-printed JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<InventorySnapshot> {
        let inventory = self.service.snapshot().await?;

        let snapshot = InventorySnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            total_profit: inventory.total_profit(),
            items: inventory.into_items(),
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot)
    }
}
