// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use partsledger::application::LedgerService;
use partsledger::domain::{NewItem, Pricing};
use partsledger::storage::StoreConfig;
use tempfile::TempDir;

pub const EPSILON: f64 = 1e-6;

/// Helper to create a test service with a temporary SQLite database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = StoreConfig::sqlite(temp_dir.path().join("test.db"));
    let service = LedgerService::open(&config).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test service with a temporary CSV file
pub async fn test_csv_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = StoreConfig::csv(temp_dir.path().join("data").join("inventory.csv"));
    let service = LedgerService::open(&config).await?;
    Ok((service, temp_dir))
}

/// Pricing used throughout: 100 + 20 shipping, rate 280, 20% margin.
/// Base cost 33600, unit profit 6720, selling price 40320.
pub fn reference_pricing() -> Pricing {
    Pricing::new(100.0, 20.0, 280.0, 20.0).unwrap()
}

pub fn reference_item(name: &str, quantity: u32) -> NewItem {
    NewItem::new(name, reference_pricing(), quantity)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}
