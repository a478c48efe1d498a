//! Checks of the input fields shared by the API endpoints.

use std::{borrow::Cow, str::FromStr};

use common::Date;
use rust_decimal::Decimal;
use service::domain::tenant;
use validator::ValidationError;

use crate::{Error, Issue};

/// Checks that the provided `value` has some non-whitespace characters.
///
/// # Errors
///
/// If the `value` is blank.
pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("too_small"));
    }
    Ok(())
}

/// Checks that the provided `value` is strictly positive.
///
/// # Errors
///
/// If the `value` is zero or negative.
pub(crate) fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("too_small"));
    }
    Ok(())
}

/// Checks that the provided `value` is a valid date string.
///
/// # Errors
///
/// If the `value` cannot be parsed as a [`Date`].
pub(crate) fn date(value: &str) -> Result<(), ValidationError> {
    if Date::parse(value).is_err() {
        return Err(ValidationError::new("invalid_date"));
    }
    Ok(())
}

/// Checks that the provided `value` is a valid [`tenant::Email`].
///
/// # Errors
///
/// If the `value` is not a valid [`tenant::Email`].
pub(crate) fn email(value: &str) -> Result<(), ValidationError> {
    if tenant::Email::new(value).is_none() {
        return Err(ValidationError::new("invalid_string"));
    }
    Ok(())
}

/// Converts an already checked input `value` of the field `name`d so.
///
/// # Errors
///
/// If the `value` is absent or doesn't convert, which means the checks of the
/// field are looser than the conversion.
pub(crate) fn field<V, T>(
    name: &'static str,
    value: Option<V>,
    convert: impl FnOnce(V) -> Option<T>,
) -> Result<T, Error> {
    value.and_then(convert).ok_or_else(|| {
        Error::validation(vec![Issue::new(
            name,
            "invalid",
            Cow::Owned(format!("Invalid `{name}`")),
        )])
    })
}

/// Converts an optional input `value` of the field `name`d so.
///
/// Blank strings are treated as absent.
///
/// # Errors
///
/// If the present `value` doesn't parse.
pub(crate) fn optional<T: FromStr>(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<T>, Error> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| field(name, Some(v), |v| v.parse().ok()))
        .transpose()
}
