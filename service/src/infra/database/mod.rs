//! [`Database`]-related implementations.

#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),

    #[cfg(test)]
    /// [`Database`] cannot be reached.
    #[display("`Database` is unavailable")]
    #[from(ignore)]
    Unavailable,
}

impl Error {
    /// Checks if the error is a violation of some referential integrity
    /// constraint.
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_foreign_key_violation(),
            #[cfg(test)]
            Self::Unavailable => false,
        }
    }
}
