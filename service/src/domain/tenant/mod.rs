//! [`Tenant`] definitions.

pub mod schedule;

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit::Creation, Date, DateTimeOf};
use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::Serialize;

use crate::domain::unit;
#[cfg(doc)]
use crate::domain::Unit;

pub use self::schedule::Schedule;

/// Person renting a [`Unit`].
#[derive(Clone, Debug)]
pub struct Tenant {
    /// ID of this [`Tenant`].
    pub id: Id,

    /// ID of the [`Unit`] this [`Tenant`] rents.
    pub unit_id: unit::Id,

    /// [`Name`] of this [`Tenant`].
    pub name: Name,

    /// [`Email`] of this [`Tenant`], receiving payment receipts.
    pub email: Email,

    /// [`Phone`] of this [`Tenant`].
    pub phone: Phone,

    /// [`Date`] when the lease of this [`Tenant`] starts.
    ///
    /// The first rent period of this [`Tenant`] starts on this [`Date`].
    pub start_date: Date,

    /// [`Status`] of this [`Tenant`].
    pub status: Status,

    /// [`DateTime`] when this [`Tenant`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Tenant`]."]
    Id
}

define_text! {
    #[doc = "Full name of a [`Tenant`]."]
    Name(max = 255)
}

define_text! {
    #[doc = "Phone number of a [`Tenant`]."]
    Phone(max = 64)
}

/// Email address of a [`Tenant`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl std::str::FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

define_kind! {
    #[doc = "Lease status of a [`Tenant`]."]
    enum Status {
        #[doc = "[`Tenant`] currently rents the [`Unit`]."]
        Active = 1,

        #[doc = "[`Tenant`] no longer rents the [`Unit`]."]
        Inactive = 2,
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Active
    }
}

/// [`DateTime`] when a [`Tenant`] was created.
pub type CreationDateTime = DateTimeOf<(Tenant, Creation)>;

#[cfg(test)]
mod spec {
    use super::Email;

    #[test]
    fn email_format() {
        assert!(Email::new("jane.doe@example.com").is_some());
        assert!(Email::new("j+rent@mail.example.co.ug").is_some());

        assert!(Email::new("").is_none());
        assert!(Email::new("jane").is_none());
        assert!(Email::new("jane@example").is_none());
        assert!(Email::new("jane doe@example.com").is_none());
        assert!(Email::new("@example.com").is_none());
    }
}
