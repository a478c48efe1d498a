//! Macros for defining kind enums.

/// Macro for defining a kind enum backed by a [`u8`] and stored as `INT2` in
/// Postgres.
///
/// Variants are displayed, parsed and (de)serialized in lowercase, unless
/// another [`strum`] case is given via `#[case = "..."]`.
///
/// Serde and Postgres support follows the features of this crate, not the
/// ones of the crate invoking the macro. The invoking crate must depend on
/// [`strum`] for the derives to resolve.
///
/// # Example
///
/// ```rust
/// use common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = 1,
///
///         #[doc = "A sphere"]
///         Sphere = 2,
///     }
/// }
///
/// define_kind! {
///     #[doc = "Shape size."]
///     #[case = "UPPERCASE"]
///     enum Size {
///         #[doc = "Extra large"]
///         Xl = 1,
///     }
/// }
///
/// assert_eq!(Kind::Sphere.u8(), 2);
/// assert_eq!(Kind::Cube.to_string(), "cube");
/// assert_eq!("sphere".parse::<Kind>(), Ok(Kind::Sphere));
/// assert_eq!(Size::Xl.to_string(), "XL");
/// assert!("xl".parse::<Size>().is_err());
/// ```
///
/// [`strum`]: https://docs.rs/strum
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident { $($body:tt)* }
    ) => {
        $crate::define_kind! {
            #[doc = $doc]
            #[case = "lowercase"]
            enum $name { $($body)* }
        }
    };

    (
        #[doc = $doc:literal]
        #[case = $case:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            PartialEq,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(serialize_all = $case)]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }
        }

        $crate::impl_kind_serde!($name);
        $crate::impl_kind_postgres!($name { $($variant),* });
    };
}

/// Implements [`serde`] traits of a [`define_kind!`] enum via its
/// [`Display`] and [`FromStr`] implementations.
///
/// [`Display`]: std::fmt::Display
/// [`FromStr`]: std::str::FromStr
#[cfg(feature = "serde")]
#[doc(hidden)]
#[macro_export]
macro_rules! impl_kind_serde {
    ($name:ident) => {
        impl $crate::private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::private::serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> $crate::private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::private::serde::Deserializer<'de>,
            {
                let raw = <::std::string::String as
                    $crate::private::serde::Deserialize>::deserialize(
                        deserializer,
                    )?;
                raw.parse::<Self>().map_err(|_| {
                    <D::Error as $crate::private::serde::de::Error>::custom(
                        ::std::format!(
                            "invalid `{}` value: `{raw}`",
                            ::core::stringify!($name),
                        ),
                    )
                })
            }
        }
    };
}

/// No-op without the `serde` feature.
#[cfg(not(feature = "serde"))]
#[doc(hidden)]
#[macro_export]
macro_rules! impl_kind_serde {
    ($name:ident) => {};
}

/// Implements [`postgres_types`] traits of a [`define_kind!`] enum, storing
/// it as `INT2`.
///
/// [`postgres_types`]: https://docs.rs/postgres-types
#[cfg(feature = "postgres")]
#[doc(hidden)]
#[macro_export]
macro_rules! impl_kind_postgres {
    ($name:ident { $($variant:ident),* }) => {
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            $crate::private::postgres_types::accepts!(INT2);

            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &[u8],
            ) -> Result<
                $name,
                Box<dyn ::std::error::Error
                    + ::core::marker::Sync
                    + ::core::marker::Send>,
            > {
                let v = <i16 as $crate::private::postgres_types::FromSql>
                    ::from_sql(ty, raw)?;
                match u8::try_from(v)? {
                    $(
                        v if Self::$variant.u8() == v => Ok(Self::$variant),
                    )*
                    v => Err(::std::format!(
                        "invalid `{}` value: {v}",
                        ::core::stringify!($name),
                    ).into()),
                }
            }
        }

        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::accepts!(INT2);
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                <i16 as $crate::private::postgres_types::ToSql>::to_sql(
                    &i16::from(self.u8()),
                    ty,
                    w,
                )
            }
        }
    };
}

/// No-op without the `postgres` feature.
#[cfg(not(feature = "postgres"))]
#[doc(hidden)]
#[macro_export]
macro_rules! impl_kind_postgres {
    ($name:ident { $($variant:ident),* }) => {};
}

#[cfg(test)]
mod spec {
    define_kind! {
        #[doc = "Occupancy."]
        enum Occupancy {
            #[doc = "Nobody lives there."]
            Vacant = 1,

            #[doc = "Somebody lives there."]
            Occupied = 2,
        }
    }

    define_kind! {
        #[doc = "Grade."]
        #[case = "UPPERCASE"]
        enum Grade {
            #[doc = "Top grade."]
            Aa = 1,
        }
    }

    #[test]
    fn displays_and_parses_in_case() {
        assert_eq!(Occupancy::Occupied.to_string(), "occupied");
        assert_eq!("vacant".parse::<Occupancy>(), Ok(Occupancy::Vacant));
        assert!("VACANT".parse::<Occupancy>().is_err());

        assert_eq!(Grade::Aa.to_string(), "AA");
        assert_eq!("AA".parse::<Grade>(), Ok(Grade::Aa));
        assert!("aa".parse::<Grade>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_in_case() {
        use serde::de::{
            value::{Error, StrDeserializer},
            Deserialize as _, IntoDeserializer as _,
        };

        let de: StrDeserializer<'_, Error> = "occupied".into_deserializer();
        assert_eq!(Occupancy::deserialize(de).unwrap(), Occupancy::Occupied);

        let de: StrDeserializer<'_, Error> = "Occupied".into_deserializer();
        assert!(Occupancy::deserialize(de).is_err());
    }
}
