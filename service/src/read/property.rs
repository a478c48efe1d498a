//! [`Property`] read models definitions.

use crate::domain::{Expense, Property, Unit};

use super::Count;

/// [`Property`] with the numbers of its related entities.
#[derive(Clone, Debug)]
pub struct Summary {
    /// Summarized [`Property`].
    pub property: Property,

    /// Number of [`Unit`]s in the [`Property`].
    pub units_count: Count,

    /// Number of [`Expense`]s made for the [`Property`].
    pub expenses_count: Count,
}

/// [`Property`] with all its related entities.
#[derive(Clone, Debug)]
pub struct Detailed {
    /// Detailed [`Property`].
    pub property: Property,

    /// [`Unit`]s of the [`Property`].
    pub units: Vec<Unit>,

    /// [`Expense`]s made for the [`Property`].
    pub expenses: Vec<Expense>,
}
