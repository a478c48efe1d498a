//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::str::FromStr;

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{
    format_description::well_known::Rfc3339, macros::format_description,
    util::days_in_year_month, Month, OffsetDateTime, UtcOffset,
};

/// Calendar date without a time zone.
///
/// Formatted as `YYYY-MM-DD`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] out of the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_calendar_date(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Parses a [`Date`] out of the provided `input`.
    ///
    /// Accepts either a plain `YYYY-MM-DD` date or an [RFC 3339] date and
    /// time, in which case the date is taken in UTC.
    ///
    /// # Errors
    ///
    /// If the `input` is neither of the accepted formats.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if let Ok(date) =
            time::Date::parse(input, format_description!("[year]-[month]-[day]"))
        {
            return Ok(Self(date));
        }
        OffsetDateTime::parse(input, &Rfc3339)
            .map(|dt| Self(dt.to_offset(UtcOffset::UTC).date()))
            .map_err(ParseError)
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month of this [`Date`] in `1..=12` range.
    #[must_use]
    pub fn month(self) -> u8 {
        self.0.month().into()
    }

    /// Returns the day of month of this [`Date`].
    #[must_use]
    pub fn day(self) -> u8 {
        self.0.day()
    }

    /// Returns the first day of the month this [`Date`] belongs to.
    #[must_use]
    pub fn month_start(self) -> Self {
        Self(self.0.replace_day(1).unwrap_or(self.0))
    }

    /// Checks whether this [`Date`] belongs to the same calendar month as the
    /// `other` one.
    #[must_use]
    pub fn is_same_month(self, other: Self) -> bool {
        self.0.year() == other.0.year() && self.0.month() == other.0.month()
    }

    /// Returns the day after this [`Date`].
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn next_day(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// Returns the day before this [`Date`].
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn previous_day(self) -> Option<Self> {
        self.0.previous_day().map(Self)
    }

    /// Advances this [`Date`] by the provided number of calendar `months`,
    /// keeping the day of month.
    ///
    /// If the target month is shorter, the day is clamped to its last day
    /// (so `Jan 31 + 1 month` is `Feb 28`, or `Feb 29` in a leap year).
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn checked_add_months(self, months: u32) -> Option<Self> {
        let index = i64::from(self.0.year()) * 12
            + i64::from(u8::from(self.0.month()))
            - 1
            + i64::from(months);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month =
            Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?)
                .ok()?;
        let day = self.0.day().min(days_in_year_month(year, month));
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the number of whole days passed from this [`Date`] until the
    /// `later` one.
    ///
    /// Negative if `later` is actually earlier.
    #[must_use]
    pub fn days_until(self, later: Self) -> i64 {
        (later.0 - self.0).whole_days()
    }

    /// Formats this [`Date`] in a long human-readable form, like
    /// `January 15, 2024`.
    #[must_use]
    pub fn to_long_string(self) -> String {
        self.0
            .format(format_description!(
                "[month repr:long] [day padding:none], [year]"
            ))
            .unwrap_or_else(|_| self.to_string())
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

/// Error of parsing [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid date: {_0}")]
pub struct ParseError(time::error::Parse);

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::Date;

    impl Serialize for Date {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let raw = String::deserialize(d)?;
            Date::parse(&raw).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test]
    fn parses_plain_dates_and_datetimes() {
        assert_eq!(
            date("2024-01-15"),
            Date::from_calendar_date(2024, 1, 15).unwrap(),
        );
        assert_eq!(date("2024-01-15T00:00:00Z"), date("2024-01-15"));
        assert_eq!(date("2024-01-15T23:30:00-02:00"), date("2024-01-16"));

        assert!(Date::parse("").is_err());
        assert!(Date::parse("2024-13-01").is_err());
        assert!(Date::parse("2023-02-29").is_err());
        assert!(Date::parse("15/01/2024").is_err());
    }

    #[test]
    fn displays_as_iso() {
        assert_eq!(date("2024-03-05").to_string(), "2024-03-05");
    }

    #[test]
    fn adds_months_keeping_day() {
        assert_eq!(
            date("2024-01-15").checked_add_months(1),
            Some(date("2024-02-15")),
        );
        assert_eq!(
            date("2024-01-15").checked_add_months(0),
            Some(date("2024-01-15")),
        );
        assert_eq!(
            date("2023-11-30").checked_add_months(3),
            Some(date("2024-02-29")),
        );
        assert_eq!(
            date("2024-12-10").checked_add_months(1),
            Some(date("2025-01-10")),
        );
        assert_eq!(
            date("2024-05-20").checked_add_months(25),
            Some(date("2026-06-20")),
        );
    }

    #[test]
    fn clamps_to_month_end() {
        assert_eq!(
            date("2023-01-31").checked_add_months(1),
            Some(date("2023-02-28")),
        );
        assert_eq!(
            date("2024-01-31").checked_add_months(1),
            Some(date("2024-02-29")),
        );
        assert_eq!(
            date("2024-03-31").checked_add_months(1),
            Some(date("2024-04-30")),
        );
        assert_eq!(
            date("2024-08-31").checked_add_months(12),
            Some(date("2025-08-31")),
        );
    }

    #[test]
    fn steps_days_across_boundaries() {
        assert_eq!(date("2024-02-28").next_day(), Some(date("2024-02-29")));
        assert_eq!(date("2024-12-31").next_day(), Some(date("2025-01-01")));
        assert_eq!(date("2024-03-01").previous_day(), Some(date("2024-02-29")));
    }

    #[test]
    fn compares_months() {
        assert!(date("2024-04-01").is_same_month(date("2024-04-30")));
        assert!(!date("2024-04-30").is_same_month(date("2024-05-01")));
        assert!(!date("2023-04-10").is_same_month(date("2024-04-10")));
        assert_eq!(date("2024-04-17").month_start(), date("2024-04-01"));
    }

    #[test]
    fn counts_days() {
        assert_eq!(date("2024-04-15").days_until(date("2024-04-20")), 5);
        assert_eq!(date("2024-02-15").days_until(date("2024-03-15")), 29);
        assert_eq!(date("2024-04-20").days_until(date("2024-04-15")), -5);
    }

    #[test]
    fn formats_long() {
        assert_eq!(date("2024-01-05").to_long_string(), "January 5, 2024");
        assert_eq!(date("2024-12-25").to_long_string(), "December 25, 2024");
    }
}
