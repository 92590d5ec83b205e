//! Player wallets: balances plus an append-only audit history.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod ledger;
pub mod player;

pub use ledger::{LedgerState, PlayerSummary, DEFAULT_STARTING_BALANCE};
pub use player::{validate_balance, HistoryEntry, Player, WagerKind};
