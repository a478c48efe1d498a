//! [`Expense`] read models definitions.

use crate::domain::{Expense, Property};

/// [`Expense`] along with the [`Property`] it's made for.
#[derive(Clone, Debug)]
pub struct Detailed {
    /// [`Expense`] itself.
    pub expense: Expense,

    /// [`Property`] the [`Expense`] is made for.
    pub property: Property,
}

pub mod list {
    //! [`Expense`]s list definitions.

    use crate::domain::property;
    #[cfg(doc)]
    use crate::domain::{Expense, Property};

    /// Filter of an [`Expense`]s list, the most recent first.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Property`] to list the [`Expense`]s of.
        pub property_id: Option<property::Id>,
    }
}
