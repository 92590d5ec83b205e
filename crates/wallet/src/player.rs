use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use chipledger_core::{DomainError, DomainResult, GameName};

/// History tag for balances written back by a client session.
pub const MANUAL_SAVE_GAME: &str = "manual-save";
/// History tag for operator adjustments.
pub const ADMIN_ADJUST_GAME: &str = "admin-adjust";

const MANUAL_SAVE_DESC: &str = "session save";
const ADMIN_DEFAULT_NOTE: &str = "admin adjustment";

/// One line of a player's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(serialize_with = "serialize_ts")]
    pub ts: DateTime<Utc>,
    pub game: String,
    pub delta: i64,
    #[serde(default)]
    pub desc: String,
}

impl HistoryEntry {
    /// Build an entry; a blank description is stored as `""`.
    pub fn new(
        occurred_at: DateTime<Utc>,
        game: impl Into<String>,
        delta: i64,
        desc: &str,
    ) -> Self {
        let desc = if desc.trim().is_empty() { "" } else { desc };
        Self {
            ts: occurred_at,
            game: game.into(),
            delta,
            desc: desc.to_string(),
        }
    }
}

// ISO-8601 with millisecond precision and a `Z` suffix, e.g. 2024-05-01T12:00:00.000Z.
fn serialize_ts<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Direction of a game-driven balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WagerKind {
    Charge,
    Payout,
}

impl WagerKind {
    fn label(self) -> &'static str {
        match self {
            WagerKind::Charge => "charge",
            WagerKind::Payout => "payout",
        }
    }

    fn invalid_amount(self) -> DomainError {
        match self {
            WagerKind::Charge => {
                DomainError::invalid_amount("Charge amount must be a positive integer.")
            }
            WagerKind::Payout => {
                DomainError::invalid_amount("Payout amount must be a positive integer.")
            }
        }
    }

    /// Amounts must be strictly positive; `None` means the input was not numeric.
    pub fn validate_amount(self, raw: Option<i64>) -> DomainResult<i64> {
        match raw {
            Some(amount) if amount > 0 => Ok(amount),
            _ => Err(self.invalid_amount()),
        }
    }

    /// Description used when the client sends none, e.g. `"slots charge"`.
    pub fn default_desc(self, game: &GameName) -> String {
        format!("{} {}", game, self.label())
    }
}

/// Balances must be non-negative; `None` means the input was not numeric.
pub fn validate_balance(raw: Option<i64>) -> DomainResult<i64> {
    match raw {
        Some(balance) if balance >= 0 => Ok(balance),
        _ => Err(DomainError::InvalidBalance),
    }
}

/// A player's wallet.
///
/// Invariant: `balance >= 0` after every operation, and each successful
/// mutation appends exactly one [`HistoryEntry`]. Failed operations leave the
/// wallet untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub balance: i64,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Player {
    pub fn new(starting_balance: i64) -> Self {
        Self {
            balance: starting_balance,
            history: Vec::new(),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Overwrite the balance with a client-reported value.
    pub fn save_session(&mut self, balance: i64, occurred_at: DateTime<Utc>) -> DomainResult<i64> {
        let balance = validate_balance(Some(balance))?;
        self.balance = balance;
        self.history.push(HistoryEntry::new(
            occurred_at,
            MANUAL_SAVE_GAME,
            0,
            MANUAL_SAVE_DESC,
        ));
        Ok(self.balance)
    }

    /// Take a wager. Fails with `InsufficientFunds` rather than going negative.
    pub fn charge(
        &mut self,
        game: &GameName,
        amount: i64,
        desc: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<i64> {
        let kind = WagerKind::Charge;
        let amount = kind.validate_amount(Some(amount))?;
        let next = self
            .balance
            .checked_sub(amount)
            .filter(|b| *b >= 0)
            .ok_or(DomainError::InsufficientFunds)?;

        self.balance = next;
        self.push_wager(kind, game, -amount, desc, occurred_at);
        Ok(self.balance)
    }

    /// Credit winnings.
    pub fn payout(
        &mut self,
        game: &GameName,
        amount: i64,
        desc: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<i64> {
        let kind = WagerKind::Payout;
        let amount = kind.validate_amount(Some(amount))?;
        let next = self
            .balance
            .checked_add(amount)
            .ok_or(DomainError::BalanceOverflow)?;

        self.balance = next;
        self.push_wager(kind, game, amount, desc, occurred_at);
        Ok(self.balance)
    }

    /// Operator override. The recorded delta is `new - old`.
    pub fn admin_set_balance(
        &mut self,
        balance: i64,
        note: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<i64> {
        let balance = validate_balance(Some(balance))?;
        let delta = balance
            .checked_sub(self.balance)
            .ok_or(DomainError::BalanceOverflow)?;
        let note = match note.trim() {
            "" => ADMIN_DEFAULT_NOTE,
            trimmed => trimmed,
        };

        self.balance = balance;
        self.history
            .push(HistoryEntry::new(occurred_at, ADMIN_ADJUST_GAME, delta, note));
        Ok(self.balance)
    }

    fn push_wager(
        &mut self,
        kind: WagerKind,
        game: &GameName,
        delta: i64,
        desc: &str,
        occurred_at: DateTime<Utc>,
    ) {
        let desc = if desc.is_empty() {
            kind.default_desc(game)
        } else {
            desc.to_string()
        };
        self.history
            .push(HistoryEntry::new(occurred_at, game.as_str(), delta, &desc));
    }
}
