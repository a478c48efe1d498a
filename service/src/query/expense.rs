//! [`Query`] collection related to [`Expense`]s.

use common::operations::By;

use crate::{domain::expense, read};
#[cfg(doc)]
use crate::{domain::Expense, Query};

use super::DatabaseQuery;

/// Queries an [`Expense`] with its [`Property`] by its [`expense::Id`].
///
/// [`Property`]: crate::domain::Property
pub type ById = DatabaseQuery<By<Option<read::expense::Detailed>, expense::Id>>;

/// Queries a filtered list of [`Expense`]s, the most recent first.
pub type List = DatabaseQuery<
    By<Vec<read::expense::Detailed>, read::expense::list::Filter>,
>;
