//! [`Unit`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Amount, DateTimeOf};

use crate::domain::property;
#[cfg(doc)]
use crate::domain::{Property, Tenant};

/// Rentable unit of a [`Property`].
#[derive(Clone, Debug)]
pub struct Unit {
    /// ID of this [`Unit`].
    pub id: Id,

    /// ID of the [`Property`] this [`Unit`] belongs to.
    pub property_id: property::Id,

    /// [`Code`] of this [`Unit`].
    pub code: Code,

    /// [`Name`] of this [`Unit`].
    pub name: Name,

    /// Monthly rent of this [`Unit`].
    pub rent_amount: Amount,

    /// Occupancy [`Status`] of this [`Unit`].
    pub status: Status,

    /// [`DateTime`] when this [`Unit`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Unit`]."]
    Id
}

define_text! {
    #[doc = "Short code identifying a [`Unit`] within its [`Property`]."]
    Code(max = 64)
}

define_text! {
    #[doc = "Human-readable name of a [`Unit`]."]
    Name(max = 255)
}

define_kind! {
    #[doc = "Occupancy status of a [`Unit`]."]
    enum Status {
        #[doc = "No active [`Tenant`] lives in the [`Unit`]."]
        Vacant = 1,

        #[doc = "The [`Unit`] is rented out to an active [`Tenant`]."]
        Occupied = 2,
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Vacant
    }
}

/// [`DateTime`] when a [`Unit`] was created.
pub type CreationDateTime = DateTimeOf<(Unit, unit::Creation)>;
