//! [`Unit`] read models definitions.

use crate::domain::{Payment, Property, Tenant, Unit};

use super::Count;

/// [`Unit`] along with the [`Property`] it belongs to.
#[derive(Clone, Debug)]
pub struct WithProperty {
    /// [`Unit`] itself.
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,
}

/// [`Unit`] with its currently active [`Tenant`]s and the numbers of its
/// related entities.
#[derive(Clone, Debug)]
pub struct Summary {
    /// Summarized [`Unit`].
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,

    /// Active [`Tenant`]s of the [`Unit`].
    pub active_tenants: Vec<Tenant>,

    /// Number of all [`Tenant`]s the [`Unit`] ever had.
    pub tenants_count: Count,

    /// Number of [`Payment`]s made for the [`Unit`].
    pub payments_count: Count,
}

/// [`Unit`] with all its related entities.
#[derive(Clone, Debug)]
pub struct Detailed {
    /// Detailed [`Unit`].
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,

    /// [`Tenant`]s of the [`Unit`].
    pub tenants: Vec<Tenant>,

    /// [`Payment`]s made for the [`Unit`].
    pub payments: Vec<Payment>,
}
