//! [`Mailer`]-related implementations.

#[cfg(feature = "smtp")]
pub mod smtp;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "smtp")]
pub use self::smtp::Smtp;

/// Mail delivery operation.
pub use common::Handler as Mailer;

/// [`Mailer`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Mail address cannot be used for delivery.
    #[display("`{_0}` is not a valid mail address")]
    #[from(ignore)]
    InvalidAddress(#[error(not(source))] String),

    #[cfg(feature = "smtp")]
    /// [`Smtp`] error.
    #[display("SMTP delivery failed: {_0}")]
    Smtp(smtp::Error),
}
