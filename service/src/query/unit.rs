//! [`Query`] collection related to [`Unit`]s.

use common::operations::By;

use crate::{domain::unit, read};
#[cfg(doc)]
use crate::{domain::Unit, Query};

use super::DatabaseQuery;

/// Queries a [`Unit`] with its related entities by its [`unit::Id`].
pub type ById = DatabaseQuery<By<Option<read::unit::Detailed>, unit::Id>>;

/// Queries a list of all [`Unit`]s, the most recently created first.
pub type List = DatabaseQuery<By<Vec<read::unit::Summary>, ()>>;
