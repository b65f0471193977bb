mod csv_store;
mod repository;

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::Inventory;

pub use csv_store::*;
pub use repository::*;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Which medium the inventory table lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Embedded SQLite database
    #[default]
    Sqlite,
    /// Single CSV file
    Csv,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Csv => "csv",
        }
    }

    pub fn default_path(&self) -> &'static str {
        match self {
            Backend::Sqlite => "partsledger.db",
            Backend::Csv => "data/inventory.csv",
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "csv" => Ok(Backend::Csv),
            _ => Err(format!("unknown backend '{}' (expected sqlite or csv)", s)),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the inventory table is persisted. Passed explicitly to [`Store::open`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: Backend,
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(backend: Backend, path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            path: path.into(),
        }
    }

    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::new(Backend::Sqlite, path)
    }

    pub fn csv(path: impl Into<PathBuf>) -> Self {
        Self::new(Backend::Csv, path)
    }

    /// Use the backend's default location when no path is given.
    pub fn with_default_path(backend: Backend, path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(|| PathBuf::from(backend.default_path()));
        Self::new(backend, path)
    }
}

/// The persistence collaborator of the ledger: whole-table load and save.
pub enum Store {
    Sqlite(Repository),
    Csv(CsvStore),
}

impl Store {
    /// Open the configured store, creating an empty one if nothing exists yet.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        match config.backend {
            Backend::Sqlite => {
                let repo = Repository::open(&config.path.to_string_lossy()).await?;
                Ok(Store::Sqlite(repo))
            }
            Backend::Csv => {
                let store = CsvStore::new(&config.path);
                store.init()?;
                Ok(Store::Csv(store))
            }
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Store::Sqlite(_) => Backend::Sqlite,
            Store::Csv(_) => Backend::Csv,
        }
    }

    pub async fn load(&self) -> Result<Inventory> {
        match self {
            Store::Sqlite(repo) => repo.load().await,
            Store::Csv(store) => store.load(),
        }
    }

    pub async fn save(&self, inventory: &Inventory) -> Result<()> {
        match self {
            Store::Sqlite(repo) => repo.save(inventory).await,
            Store::Csv(store) => store.save(inventory),
        }
    }
}
