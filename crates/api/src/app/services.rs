use std::sync::Arc;

use chipledger_infra::{BalanceLedger, JsonFileStore, LedgerStore};

use crate::config::AppConfig;

/// Ledger over a type-erased store so tests can swap the backend.
pub type Ledger = BalanceLedger<Arc<dyn LedgerStore>>;

/// Shared application state handed to every handler.
pub struct AppServices {
    ledger: Ledger,
}

impl AppServices {
    pub fn new(store: Arc<dyn LedgerStore>, starting_balance: i64) -> Self {
        Self {
            ledger: BalanceLedger::open(store, starting_balance),
        }
    }

    /// File-backed services, loading whatever the data file already holds.
    pub fn from_config(config: &AppConfig) -> Self {
        let store: Arc<dyn LedgerStore> = Arc::new(JsonFileStore::new(&config.data_file));
        Self::new(store, config.starting_balance)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
