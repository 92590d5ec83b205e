//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant carries a stable wire code (see [`DomainError::code`]); the
/// `Display` output is the human-readable message sent alongside it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Username missing, not a string, or blank.
    #[error("Username is required.")]
    InvalidUsername,

    /// Game name missing, not a string, or blank.
    #[error("Game name is required.")]
    InvalidGame,

    /// A charge/payout amount was not a positive integer.
    #[error("{0}")]
    InvalidAmount(String),

    /// A balance was not a non-negative integer.
    #[error("Balance must be a non-negative integer.")]
    InvalidBalance,

    /// A charge would take the balance below zero.
    #[error("Wager exceeds current balance.")]
    InsufficientFunds,

    /// A payout would push the balance past `i64::MAX`.
    #[error("Balance would exceed the supported range.")]
    BalanceOverflow,
}

impl DomainError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidGame => "INVALID_GAME",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidBalance => "INVALID_BALANCE",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::BalanceOverflow => "BALANCE_OVERFLOW",
        }
    }
}
