//! Rent [`Period`] calculation.

use common::Date;
use derive_more::{Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::Serialize;

#[cfg(doc)]
use crate::domain::{Payment, Tenant};

/// Number of calendar months a [`Payment`] covers.
///
/// Always at least `1`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct MonthsCovered(i32);

impl MonthsCovered {
    /// Creates a new [`MonthsCovered`] if the given number of `months` is
    /// positive.
    #[must_use]
    pub fn new(months: i32) -> Option<Self> {
        (months >= 1).then_some(Self(months))
    }
}

/// Inclusive range of days a [`Payment`] covers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Period {
    /// First day of this [`Period`].
    pub start: Date,

    /// Last day of this [`Period`].
    pub end: Date,
}

impl Period {
    /// Computes the [`Period`] starting on the provided `start` [`Date`] and
    /// covering the provided number of calendar `months`.
    ///
    /// The [`Period`] ends one day before the `start` advanced by `months`,
    /// with the day of month clamped to the end of shorter months. So a
    /// month starting on January 31 ends on February 27 (or February 28 in a
    /// leap year).
    ///
    /// [`None`] is returned if the end falls out of the supported [`Date`]
    /// range.
    #[must_use]
    pub fn covering(start: Date, months: MonthsCovered) -> Option<Self> {
        let months = u32::try_from(months.0).ok()?;
        let end = start.checked_add_months(months)?.previous_day()?;
        Some(Self { start, end })
    }

    /// Returns the [`Date`] the [`Period`] following this one starts on.
    ///
    /// [`None`] is returned if this [`Period`] ends on the last supported
    /// [`Date`].
    #[must_use]
    pub fn next_start(&self) -> Option<Date> {
        self.end.next_day()
    }

    /// Returns the [`Date`] the next [`Period`] of a [`Tenant`] starts on.
    ///
    /// That is the day after the `latest` [`Period`] paid by the [`Tenant`],
    /// or the `lease_start` if nothing was paid yet.
    #[must_use]
    pub fn seed(latest: Option<&Self>, lease_start: Date) -> Option<Date> {
        match latest {
            Some(period) => period.next_start(),
            None => Some(lease_start),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use super::{MonthsCovered, Period};

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn months(n: i32) -> MonthsCovered {
        MonthsCovered::new(n).unwrap()
    }

    fn period(start: &str, end: &str) -> Period {
        Period {
            start: date(start),
            end: date(end),
        }
    }

    #[test]
    fn rejects_non_positive_months() {
        assert!(MonthsCovered::new(0).is_none());
        assert!(MonthsCovered::new(-3).is_none());
        assert!(MonthsCovered::new(1).is_some());
    }

    #[test]
    fn first_period_starts_on_lease_start() {
        let seed = Period::seed(None, date("2024-01-15")).unwrap();

        assert_eq!(
            Period::covering(seed, months(1)),
            Some(period("2024-01-15", "2024-02-14")),
        );
    }

    #[test]
    fn next_period_follows_previous_one() {
        let first = period("2024-01-15", "2024-02-14");
        let seed = Period::seed(Some(&first), date("2024-01-15")).unwrap();

        assert_eq!(
            Period::covering(seed, months(2)),
            Some(period("2024-02-15", "2024-04-14")),
        );
    }

    #[test]
    fn clamps_to_shorter_months() {
        assert_eq!(
            Period::covering(date("2023-01-31"), months(1)),
            Some(period("2023-01-31", "2023-02-27")),
        );
        assert_eq!(
            Period::covering(date("2024-01-31"), months(1)),
            Some(period("2024-01-31", "2024-02-28")),
        );
        assert_eq!(
            Period::covering(date("2024-03-31"), months(1)),
            Some(period("2024-03-31", "2024-04-29")),
        );
        assert_eq!(
            Period::covering(date("2024-12-01"), months(1)),
            Some(period("2024-12-01", "2024-12-31")),
        );
        assert_eq!(
            Period::covering(date("2024-02-29"), months(12)),
            Some(period("2024-02-29", "2025-02-27")),
        );
    }

    #[test]
    fn ends_day_before_advanced_start() {
        let mut start = date("2023-01-01");
        while start < date("2025-01-01") {
            for n in 1..=14 {
                let period = Period::covering(start, months(n)).unwrap();
                let advanced = start
                    .checked_add_months(u32::try_from(n).unwrap())
                    .unwrap();

                assert_eq!(period.start, start);
                assert_eq!(period.end.next_day(), Some(advanced));
                assert!(period.end >= start);
            }
            start = start.next_day().unwrap();
        }
    }

    #[test]
    fn successive_periods_are_contiguous() {
        let lease_start = date("2024-01-31");
        let mut latest: Option<Period> = None;
        for n in [1, 2, 1, 3, 1] {
            let seed = Period::seed(latest.as_ref(), lease_start).unwrap();
            let next = Period::covering(seed, months(n)).unwrap();
            if let Some(prev) = latest {
                assert_eq!(prev.end.next_day(), Some(next.start));
            } else {
                assert_eq!(next.start, lease_start);
            }
            latest = Some(next);
        }
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(
            Period::covering(date("2024-05-31"), months(3)),
            Period::covering(date("2024-05-31"), months(3)),
        );
    }
}
