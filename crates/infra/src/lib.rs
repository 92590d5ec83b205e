//! Infrastructure layer: ledger persistence and the shared ledger service.

pub mod ledger;
pub mod store;

pub use ledger::{BalanceLedger, PlayerDetail};
pub use store::{InMemoryLedgerStore, JsonFileStore, LedgerStore, StoreError};
