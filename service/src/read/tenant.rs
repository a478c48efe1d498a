//! [`Tenant`] read models definitions.

use crate::domain::{Payment, Property, Tenant, Unit};
#[cfg(doc)]
use crate::domain::tenant::Status;

use super::Count;

/// [`Tenant`] along with the [`Unit`] it rents.
#[derive(Clone, Debug)]
pub struct WithUnit {
    /// [`Tenant`] itself.
    pub tenant: Tenant,

    /// [`Unit`] the [`Tenant`] rents.
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,
}

/// [`Tenant`] with the [`Unit`] it rents and the number of its [`Payment`]s.
#[derive(Clone, Debug)]
pub struct Summary {
    /// Summarized [`Tenant`].
    pub tenant: Tenant,

    /// [`Unit`] the [`Tenant`] rents.
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,

    /// Number of [`Payment`]s the [`Tenant`] made.
    pub payments_count: Count,
}

/// [`Tenant`] with all its related entities.
#[derive(Clone, Debug)]
pub struct Detailed {
    /// Detailed [`Tenant`].
    pub tenant: Tenant,

    /// [`Unit`] the [`Tenant`] rents.
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,

    /// [`Payment`]s of the [`Tenant`], the most recently made first.
    pub payments: Vec<Payment>,
}

/// [`Tenant`] with the [`Unit`] it rents and its latest [`Payment`].
#[derive(Clone, Debug)]
pub struct WithLatestPayment {
    /// [`Tenant`] itself.
    pub tenant: Tenant,

    /// [`Unit`] the [`Tenant`] rents.
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,

    /// [`Payment`] covering the latest period, if any.
    pub latest_payment: Option<Payment>,
}

/// Number of [`Status::Active`] [`Tenant`]s renting some [`Unit`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActiveCount(pub Count);
