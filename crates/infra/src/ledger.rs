//! Shared ledger service: one in-memory state, persisted after every change.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;

use chipledger_core::{DomainResult, GameName, Username};
use chipledger_wallet::{HistoryEntry, LedgerState, Player, PlayerSummary};

use crate::store::LedgerStore;

/// Full view of one player for the admin detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerDetail {
    pub username: Username,
    pub balance: i64,
    pub history: Vec<HistoryEntry>,
}

/// The process-wide ledger.
///
/// Every operation runs under a single lock. Player lookups create missing
/// players with the starting balance, and creation is persisted immediately
/// even when the operation that triggered it is then rejected.
///
/// Persistence failures are logged and swallowed: the in-memory state stays
/// authoritative and the next successful save catches the file up.
///
/// Saves are synchronous file writes under the lock; the calling worker
/// blocks for the duration of the write.
pub struct BalanceLedger<S> {
    state: Mutex<LedgerState>,
    store: S,
    starting_balance: i64,
}

impl<S: LedgerStore> BalanceLedger<S> {
    /// Load the ledger from `store`. An unreadable snapshot is logged and
    /// replaced by an empty ledger.
    pub fn open(store: S, starting_balance: i64) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => {
                tracing::info!(players = state.len(), "ledger loaded");
                state
            }
            Ok(None) => {
                tracing::info!("no saved ledger; starting empty");
                LedgerState::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load ledger; starting empty");
                LedgerState::new()
            }
        };

        Self {
            state: Mutex::new(state),
            store,
            starting_balance,
        }
    }

    /// Current balance, creating the player on first sight.
    pub fn profile(&self, username: &Username) -> i64 {
        let mut state = self.lock();
        let (player, created) = state.get_or_create(username, self.starting_balance);
        let balance = player.balance();
        if created {
            self.persist(&state);
        }
        balance
    }

    /// Overwrite the balance with the value a client session reports.
    pub fn save_session(&self, username: &Username, balance: i64) -> DomainResult<i64> {
        self.mutate(username, |player| player.save_session(balance, Utc::now()))
            .inspect(|balance| tracing::info!(%username, balance, "session saved"))
    }

    pub fn charge(
        &self,
        username: &Username,
        game: &GameName,
        amount: i64,
        desc: &str,
    ) -> DomainResult<i64> {
        self.mutate(username, |player| player.charge(game, amount, desc, Utc::now()))
            .inspect(|balance| tracing::info!(%username, %game, amount, balance, "charged"))
            .inspect_err(|e| tracing::debug!(%username, %game, amount, error = %e, "charge rejected"))
    }

    pub fn payout(
        &self,
        username: &Username,
        game: &GameName,
        amount: i64,
        desc: &str,
    ) -> DomainResult<i64> {
        self.mutate(username, |player| player.payout(game, amount, desc, Utc::now()))
            .inspect(|balance| tracing::info!(%username, %game, amount, balance, "paid out"))
    }

    /// Operator override of a balance; blank notes get a default.
    pub fn set_balance(&self, username: &Username, balance: i64, note: &str) -> DomainResult<i64> {
        self.mutate(username, |player| player.admin_set_balance(balance, note, Utc::now()))
            .inspect(|balance| tracing::info!(%username, balance, "balance set by admin"))
    }

    pub fn list_players(&self) -> Vec<PlayerSummary> {
        self.lock().summaries()
    }

    /// Balance and full history, creating the player on first sight.
    pub fn player_detail(&self, username: &Username) -> PlayerDetail {
        let mut state = self.lock();
        let (player, created) = state.get_or_create(username, self.starting_balance);
        let detail = PlayerDetail {
            username: username.clone(),
            balance: player.balance(),
            history: player.history().to_vec(),
        };
        if created {
            self.persist(&state);
        }
        detail
    }

    /// Remove a player. Returns whether one existed; absent players are not an error.
    pub fn delete_player(&self, username: &Username) -> bool {
        let mut state = self.lock();
        let removed = state.remove(username);
        if removed {
            tracing::info!(%username, "player deleted");
            self.persist(&state);
        }
        removed
    }

    fn mutate<F>(&self, username: &Username, op: F) -> DomainResult<i64>
    where
        F: FnOnce(&mut Player) -> DomainResult<i64>,
    {
        let mut state = self.lock();
        let (player, created) = state.get_or_create(username, self.starting_balance);
        let result = op(player);
        if created || result.is_ok() {
            self.persist(&state);
        }
        result
    }

    fn persist(&self, state: &LedgerState) {
        if let Err(e) = self.store.save(state) {
            tracing::error!(error = %e, "failed to save ledger");
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
