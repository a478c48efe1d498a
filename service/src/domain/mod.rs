//! Domain definitions.

/// Defines a [`Uuid`]-backed ID of a domain entity.
///
/// [`Uuid`]: uuid::Uuid
macro_rules! define_id {
    (
        #[doc = $doc:literal]
        $name:ident
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            ::serde::Deserialize,
            ::derive_more::Display,
            Eq,
            ::derive_more::From,
            ::derive_more::FromStr,
            Hash,
            ::derive_more::Into,
            Ord,
            PartialEq,
            PartialOrd,
            ::serde::Serialize,
        )]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::ToSql, ::postgres_types::FromSql),
            postgres(transparent)
        )]
        #[doc = $doc]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// Defines a non-empty free-form text value of a domain entity, limited to
/// the provided number of characters.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident(max = $max:literal)
    ) => {
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            PartialEq,
            ::serde::Serialize,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::ToSql, ::postgres_types::FromSql),
            postgres(transparent)
        )]
        #[doc = $doc]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Maximum number of characters allowed.
            pub const MAX_LEN: usize = $max;

            #[doc = concat!(
                "Creates a new [`",
                stringify!($name),
                "`] if the given `value` is valid.",
            )]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                Self::check(&value).then_some(Self(value))
            }

            #[doc = concat!(
                "Checks whether the given `value` is a valid [`",
                stringify!($name),
                "`].",
            )]
            fn check(value: &str) -> bool {
                !value.trim().is_empty() && value.chars().count() <= $max
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}

pub mod expense;
pub mod payment;
pub mod property;
pub mod tenant;
pub mod unit;

pub use self::{
    expense::Expense, payment::Payment, property::Property, tenant::Tenant,
    unit::Unit,
};

#[cfg(test)]
mod spec {
    use super::property;

    #[test]
    fn text_rejects_blank_and_overlong_values() {
        assert!(property::Name::new("Sunset Villas").is_some());
        assert!(property::Name::new(" padded ").is_some());

        assert!(property::Name::new("").is_none());
        assert!(property::Name::new("   ").is_none());
        assert!(property::Name::new("x".repeat(256)).is_none());
        assert!(property::Name::new("x".repeat(255)).is_some());
    }

    #[test]
    fn ids_are_random_and_parseable() {
        let id = property::Id::new();

        assert_ne!(id, property::Id::new());
        assert_eq!(id.to_string().parse::<property::Id>().unwrap(), id);
        assert!("not-a-uuid".parse::<property::Id>().is_err());
    }
}
