//! [`Property`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};

/// Real estate property containing rentable [`Unit`]s.
///
/// [`Unit`]: crate::domain::Unit
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Code`] of this [`Property`].
    pub code: Code,

    /// [`Name`] of this [`Property`].
    pub name: Name,

    /// [`Address`] of this [`Property`].
    pub address: Address,

    /// Optional [`Description`] of this [`Property`].
    pub description: Option<Description>,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Property`]."]
    Id
}

define_text! {
    #[doc = "Short code identifying a [`Property`] within the portfolio."]
    Code(max = 64)
}

define_text! {
    #[doc = "Human-readable name of a [`Property`]."]
    Name(max = 255)
}

define_text! {
    #[doc = "Postal address of a [`Property`]."]
    Address(max = 512)
}

define_text! {
    #[doc = "Free-form description of a [`Property`]."]
    Description(max = 2000)
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;
