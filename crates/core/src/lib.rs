//! `chipledger-core` — value objects and the domain error model.
//!
//! No IO here: parsing and validation of request-level primitives only.

pub mod error;
pub mod name;
pub mod number;

pub use error::{DomainError, DomainResult};
pub use name::{GameName, Username};
pub use number::parse_integer;
