//! [`Expense`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit::Creation, Amount, Date, DateTimeOf};

use crate::domain::property;
#[cfg(doc)]
use crate::domain::Property;

/// Money spent on a [`Property`].
#[derive(Clone, Debug)]
pub struct Expense {
    /// ID of this [`Expense`].
    pub id: Id,

    /// ID of the [`Property`] this [`Expense`] is made for.
    pub property_id: property::Id,

    /// [`Description`] of this [`Expense`].
    pub description: Description,

    /// Spent amount.
    pub amount: Amount,

    /// [`Category`] of this [`Expense`].
    pub category: Category,

    /// [`Date`] this [`Expense`] was made on.
    pub date: Date,

    /// Additional [`Notes`] about this [`Expense`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Expense`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of an [`Expense`]."]
    Id
}

define_text! {
    #[doc = "Description of what an [`Expense`] was made for."]
    Description(max = 512)
}

define_text! {
    #[doc = "Category of an [`Expense`] (repairs, utilities, taxes, etc)."]
    Category(max = 64)
}

define_text! {
    #[doc = "Additional notes about an [`Expense`]."]
    Notes(max = 2000)
}

/// [`DateTime`] when an [`Expense`] was created.
pub type CreationDateTime = DateTimeOf<(Expense, Creation)>;
