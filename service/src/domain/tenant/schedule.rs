//! Rent [`Schedule`] projection.

use common::Date;

use crate::domain::payment::Period;
#[cfg(doc)]
use crate::domain::{Payment, Tenant};

/// Rent schedule of a [`Tenant`] as of some day.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Schedule {
    /// [`Date`] the next rent [`Payment`] is due on.
    pub next_due_date: Date,

    /// Indicator whether the next rent [`Payment`] is due strictly before
    /// today.
    pub is_overdue: bool,

    /// Indicator whether the next rent [`Payment`] is due within the current
    /// calendar month.
    pub is_due_this_month: bool,

    /// Indicator whether the next rent [`Payment`] is due within the next
    /// calendar month.
    pub is_due_next_month: bool,

    /// Number of whole days the next rent [`Payment`] is overdue.
    ///
    /// Zero if it's not overdue.
    pub days_overdue: u32,
}

impl Schedule {
    /// Projects the [`Schedule`] of a [`Tenant`] whose lease started on
    /// `lease_start` and whose `latest` paid [`Period`] is the provided one,
    /// as of `today`.
    ///
    /// [`None`] is returned if the next due [`Date`] is out of the supported
    /// range.
    #[must_use]
    pub fn project(
        lease_start: Date,
        latest: Option<&Period>,
        today: Date,
    ) -> Option<Self> {
        let next_due_date = Period::seed(latest, lease_start)?;

        let is_overdue = next_due_date < today;
        let next_month = today.month_start().checked_add_months(1);

        Some(Self {
            next_due_date,
            is_overdue,
            is_due_this_month: next_due_date.is_same_month(today),
            is_due_next_month: next_month
                .is_some_and(|m| next_due_date.is_same_month(m)),
            days_overdue: if is_overdue {
                u32::try_from(next_due_date.days_until(today))
                    .unwrap_or(u32::MAX)
            } else {
                0
            },
        })
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::domain::payment::Period;

    use super::Schedule;

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test]
    fn lease_starting_today_is_due_not_overdue() {
        let today = date("2024-04-20");

        let schedule = Schedule::project(today, None, today).unwrap();

        assert_eq!(
            schedule,
            Schedule {
                next_due_date: today,
                is_overdue: false,
                is_due_this_month: true,
                is_due_next_month: false,
                days_overdue: 0,
            },
        );
    }

    #[test]
    fn overdue_after_paid_period_ends() {
        let latest = Period {
            start: date("2024-02-15"),
            end: date("2024-04-14"),
        };

        let schedule = Schedule::project(
            date("2024-01-15"),
            Some(&latest),
            date("2024-04-20"),
        )
        .unwrap();

        assert_eq!(schedule.next_due_date, date("2024-04-15"));
        assert!(schedule.is_overdue);
        assert!(schedule.is_due_this_month);
        assert!(!schedule.is_due_next_month);
        assert_eq!(schedule.days_overdue, 5);
    }

    #[test]
    fn due_next_month() {
        let latest = Period {
            start: date("2024-11-05"),
            end: date("2024-12-04"),
        };

        let schedule = Schedule::project(
            date("2024-11-05"),
            Some(&latest),
            date("2024-11-30"),
        )
        .unwrap();

        assert_eq!(schedule.next_due_date, date("2024-12-05"));
        assert!(!schedule.is_overdue);
        assert!(!schedule.is_due_this_month);
        assert!(schedule.is_due_next_month);
        assert_eq!(schedule.days_overdue, 0);
    }

    #[test]
    fn next_month_wraps_year() {
        let schedule = Schedule::project(
            date("2025-01-31"),
            None,
            date("2024-12-31"),
        )
        .unwrap();

        assert!(schedule.is_due_next_month);
        assert!(!schedule.is_due_this_month);
    }

    #[test]
    fn far_future_is_in_no_bucket() {
        let schedule =
            Schedule::project(date("2024-09-01"), None, date("2024-04-20"))
                .unwrap();

        assert!(!schedule.is_overdue);
        assert!(!schedule.is_due_this_month);
        assert!(!schedule.is_due_next_month);
    }

    #[test]
    fn overdue_from_previous_months() {
        let schedule =
            Schedule::project(date("2024-02-10"), None, date("2024-04-20"))
                .unwrap();

        assert!(schedule.is_overdue);
        assert!(!schedule.is_due_this_month);
        assert_eq!(schedule.days_overdue, 70);
    }

    #[test]
    fn is_idempotent() {
        let latest = Period {
            start: date("2024-01-15"),
            end: date("2024-02-14"),
        };
        let project = || {
            Schedule::project(
                date("2024-01-15"),
                Some(&latest),
                date("2024-03-01"),
            )
        };

        assert_eq!(project(), project());
    }
}
