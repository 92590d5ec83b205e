//! Snapshot persistence boundary.
//!
//! The ledger is small and persisted as one document: every save replaces
//! the previous snapshot wholesale.

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryLedgerStore;
pub use json_file::JsonFileStore;

use std::sync::Arc;

use thiserror::Error;

use chipledger_wallet::LedgerState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed ledger document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but has no `players` object.
    #[error("ledger document has no `players` object")]
    MissingPlayers,
}

/// Whole-snapshot store for the ledger state.
pub trait LedgerStore: Send + Sync {
    /// Load the last saved snapshot. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<LedgerState>, StoreError>;

    /// Replace the stored snapshot.
    fn save(&self, state: &LedgerState) -> Result<(), StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        (**self).load()
    }

    fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        (**self).save(state)
    }
}
