//! [`Payment`] definitions.

pub mod period;
pub mod receipt;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit::Creation, Amount, Date, DateTimeOf};

use crate::domain::{tenant, unit};
#[cfg(doc)]
use crate::domain::{Tenant, Unit};

pub use self::{
    period::{MonthsCovered, Period},
    receipt::Receipt,
};

/// Rent paid by a [`Tenant`] for a [`Unit`].
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`Tenant`] who made this [`Payment`].
    pub tenant_id: tenant::Id,

    /// ID of the [`Unit`] this [`Payment`] is made for.
    pub unit_id: unit::Id,

    /// Paid amount.
    pub amount: Amount,

    /// [`Date`] when this [`Payment`] was made.
    pub payment_date: Date,

    /// Number of calendar months this [`Payment`] covers.
    pub months_covered: MonthsCovered,

    /// [`Period`] this [`Payment`] covers.
    pub period: Period,

    /// [`Method`] this [`Payment`] was made with, if known.
    pub method: Option<Method>,

    /// External [`Reference`] of this [`Payment`], if any.
    pub reference: Option<Reference>,

    /// Additional [`Notes`] about this [`Payment`].
    pub notes: Option<Notes>,

    /// [`Status`] of this [`Payment`].
    pub status: Status,

    /// Indicator whether a [`Receipt`] of this [`Payment`] has been
    /// delivered to the [`Tenant`].
    pub receipt_sent: bool,

    /// [`DateTime`] when this [`Payment`] was created.
    pub created_at: CreationDateTime,
}

impl Payment {
    /// Returns the number under which this [`Payment`] is acknowledged in its
    /// [`Receipt`].
    ///
    /// That's the [`Reference`] if provided, or the [`Id`] otherwise.
    #[must_use]
    pub fn receipt_number(&self) -> String {
        self.reference
            .as_ref()
            .map_or_else(|| self.id.to_string(), ToString::to_string)
    }
}

define_id! {
    #[doc = "ID of a [`Payment`]."]
    Id
}

define_text! {
    #[doc = "Method a [`Payment`] was made with (cash, bank transfer, etc)."]
    Method(max = 64)
}

define_text! {
    #[doc = "External reference of a [`Payment`] (bank slip, transaction ID)."]
    Reference(max = 255)
}

define_text! {
    #[doc = "Additional notes about a [`Payment`]."]
    Notes(max = 2000)
}

define_kind! {
    #[doc = "Status of a [`Payment`]."]
    enum Status {
        #[doc = "[`Payment`] has been received."]
        Completed = 1,
    }
}

/// [`DateTime`] when a [`Payment`] was created.
pub type CreationDateTime = DateTimeOf<(Payment, Creation)>;
