//! Dashboard read models definitions.

#[cfg(doc)]
use crate::domain::{tenant::Status, Payment, Property, Tenant, Unit};

use super::{payment, Count};

/// Totals of the managed portfolio.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Totals {
    /// Number of [`Property`]s.
    pub properties: Count,

    /// Number of [`Unit`]s.
    pub units: Count,

    /// Number of [`Status::Active`] [`Tenant`]s.
    pub active_tenants: Count,
}

/// Overview of the managed portfolio.
#[derive(Clone, Debug)]
pub struct Dashboard {
    /// [`Totals`] of the portfolio.
    pub totals: Totals,

    /// The most recently made [`Payment`]s.
    pub recent_payments: Vec<payment::Detailed>,
}
