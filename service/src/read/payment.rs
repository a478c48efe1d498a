//! [`Payment`] read models definitions.

use crate::domain::{payment, tenant, Payment, Property, Tenant, Unit};

/// [`Payment`] along with the [`Tenant`] who made it and the [`Unit`] it's
/// made for.
#[derive(Clone, Debug)]
pub struct Detailed {
    /// [`Payment`] itself.
    pub payment: Payment,

    /// [`Tenant`] who made the [`Payment`].
    pub tenant: Tenant,

    /// [`Unit`] the [`Payment`] is made for.
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,
}

/// Selector of the [`Payment`] covering the latest period of a [`Tenant`].
#[derive(Clone, Copy, Debug)]
pub struct LatestOf {
    /// ID of the [`Tenant`] to select the [`Payment`] of.
    pub tenant_id: tenant::Id,

    /// ID of the [`Payment`] to disregard, if any.
    pub except: Option<payment::Id>,
}

pub mod list {
    //! [`Payment`]s list definitions.

    use crate::domain::{payment, tenant};
    #[cfg(doc)]
    use crate::domain::{Payment, Tenant};

    /// Filter of a [`Payment`]s list, the most recently made first.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`payment::Status`] to list the [`Payment`]s with.
        pub status: Option<payment::Status>,

        /// ID of the [`Tenant`] to list the [`Payment`]s of.
        pub tenant_id: Option<tenant::Id>,

        /// Maximum number of [`Payment`]s to list.
        pub limit: Option<u16>,
    }
}
