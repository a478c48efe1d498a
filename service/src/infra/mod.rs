//! Infrastructure layer.

pub mod database;
pub mod mailer;

pub use self::{database::Database, mailer::Mailer};
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
#[cfg(feature = "smtp")]
pub use self::mailer::{smtp, Smtp};
