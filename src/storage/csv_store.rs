use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::domain::{COLUMNS, Inventory, InventoryItem};

/// Flat-file store: one CSV file whose header row is the inventory schema.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the file exists, writing an empty table (header only) if not.
    pub fn init(&self) -> Result<()> {
        if !self.path.exists() {
            self.save(&Inventory::new())?;
            info!(path = %self.path.display(), "created empty inventory file");
        }
        Ok(())
    }

    /// Read the table. A missing file is created with just the header row and
    /// read as an empty table.
    pub fn load(&self) -> Result<Inventory> {
        self.init()?;

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", self.path.display()))?;
        if !headers.iter().eq(COLUMNS.iter().copied()) {
            bail!(
                "Unexpected columns in {}: expected [{}], found [{}]",
                self.path.display(),
                COLUMNS.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            );
        }

        let mut items = Vec::new();
        for (line_num, result) in reader.deserialize::<InventoryItem>().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing
            let item = result.with_context(|| format!("Invalid row on line {}", line))?;
            item.validate()
                .with_context(|| format!("Invalid pricing on line {}", line))?;
            items.push(item);
        }

        debug!(rows = items.len(), path = %self.path.display(), "loaded inventory from csv");
        Ok(Inventory::from_items(items))
    }

    /// Rewrite the whole file. The new content goes to a sibling temp file first
    /// and is renamed over the old one.
    pub fn save(&self, inventory: &Inventory) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp_path)
                .with_context(|| format!("Failed to create {}", tmp_path.display()))?;

            writer.write_record(COLUMNS)?;
            for item in inventory.items() {
                writer
                    .serialize(item)
                    .with_context(|| format!("Failed to write item {}", item.id))?;
            }
            writer.flush()?;
        }

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(rows = inventory.len(), path = %self.path.display(), "saved inventory to csv");
        Ok(())
    }
}
