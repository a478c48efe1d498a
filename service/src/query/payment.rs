//! [`Query`] collection related to [`Payment`]s.

use common::operations::By;

use crate::{domain::payment, read};
#[cfg(doc)]
use crate::{domain::Payment, Query};

use super::DatabaseQuery;

/// Queries a [`Payment`] with its related entities by its [`payment::Id`].
pub type ById = DatabaseQuery<By<Option<read::payment::Detailed>, payment::Id>>;

/// Queries a filtered list of [`Payment`]s, the most recently made first.
pub type List = DatabaseQuery<
    By<Vec<read::payment::Detailed>, read::payment::list::Filter>,
>;
