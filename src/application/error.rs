use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Item id '{0}' is ambiguous, use more characters")]
    AmbiguousItemId(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
