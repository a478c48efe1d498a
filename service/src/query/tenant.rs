//! [`Query`] collection related to [`Tenant`]s.

use common::operations::By;

use crate::{domain::tenant, read};
#[cfg(doc)]
use crate::{domain::Tenant, Query};

use super::DatabaseQuery;

/// Queries a [`Tenant`] with its related entities by its [`tenant::Id`].
pub type ById = DatabaseQuery<By<Option<read::tenant::Detailed>, tenant::Id>>;

/// Queries a list of all [`Tenant`]s, the most recently created first.
pub type List = DatabaseQuery<By<Vec<read::tenant::Summary>, ()>>;
