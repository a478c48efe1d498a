//! [`Query`] collection related to [`Property`]s.

use common::operations::By;

use crate::{domain::property, read};
#[cfg(doc)]
use crate::{domain::Property, Query};

use super::DatabaseQuery;

/// Queries a [`Property`] with its related entities by its [`property::Id`].
pub type ById = DatabaseQuery<By<Option<read::property::Detailed>, property::Id>>;

/// Queries a list of all [`Property`]s, the most recently created first.
pub type List = DatabaseQuery<By<Vec<read::property::Summary>, ()>>;
