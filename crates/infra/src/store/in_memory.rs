use std::sync::{PoisonError, RwLock};

use chipledger_wallet::LedgerState;

use super::{LedgerStore, StoreError};

/// In-memory snapshot store.
///
/// Intended for tests/dev. Records how many times it was saved so callers can
/// assert on persistence behavior.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    snapshot: RwLock<Option<LedgerState>>,
    saves: RwLock<usize>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing snapshot (as if loaded from disk).
    pub fn with_snapshot(state: LedgerState) -> Self {
        Self {
            snapshot: RwLock::new(Some(state)),
            saves: RwLock::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<LedgerState> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        *self.saves.write().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
