//! Trimmed, non-empty string value objects (player and game names).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;

/// Player identity as it appears in requests and in the ledger file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

/// Name of the game a charge or payout is booked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameName(String);

macro_rules! impl_trimmed_name {
    ($t:ty, $err:expr) => {
        impl $t {
            /// Parse from a raw string: trims surrounding whitespace and
            /// rejects the empty result.
            pub fn parse(raw: &str) -> Result<Self, DomainError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err($err);
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Parse from an arbitrary JSON value; anything but a string is rejected.
            pub fn from_value(value: Option<&Value>) -> Result<Self, DomainError> {
                match value {
                    Some(Value::String(s)) => Self::parse(s),
                    _ => Err($err),
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl core::str::FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_trimmed_name!(Username, DomainError::InvalidUsername);
impl_trimmed_name!(GameName, DomainError::InvalidGame);
