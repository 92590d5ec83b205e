use std::collections::btree_map::{BTreeMap, Entry};

use serde::{Deserialize, Serialize};

use chipledger_core::Username;

use crate::player::Player;

/// Balance a player receives the first time they are seen.
pub const DEFAULT_STARTING_BALANCE: i64 = 1000;

/// The whole ledger: every known player keyed by username.
///
/// This is also the persisted document shape (`{"players": {...}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub players: BTreeMap<Username, Player>,
}

/// Row of the admin overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub username: Username,
    pub balance: i64,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a player, creating one with `starting_balance` if absent.
    ///
    /// The flag is `true` when the player was created by this call.
    pub fn get_or_create(&mut self, username: &Username, starting_balance: i64) -> (&mut Player, bool) {
        match self.players.entry(username.clone()) {
            Entry::Occupied(e) => (e.into_mut(), false),
            Entry::Vacant(v) => (v.insert(Player::new(starting_balance)), true),
        }
    }

    pub fn get(&self, username: &Username) -> Option<&Player> {
        self.players.get(username)
    }

    /// Remove a player; returns whether one existed.
    pub fn remove(&mut self, username: &Username) -> bool {
        self.players.remove(username).is_some()
    }

    /// `(username, balance)` for every player, ordered by username.
    pub fn summaries(&self) -> Vec<PlayerSummary> {
        self.players
            .iter()
            .map(|(username, p)| PlayerSummary {
                username: username.clone(),
                balance: p.balance,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
