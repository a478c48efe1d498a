//! Rent [`Schedule`] read models definitions.

use crate::domain::{tenant::Schedule, Payment, Property, Tenant, Unit};

/// Rent [`Schedule`] of an active [`Tenant`].
#[derive(Clone, Debug)]
pub struct Entry {
    /// [`Tenant`] the [`Schedule`] is projected for.
    pub tenant: Tenant,

    /// [`Unit`] the [`Tenant`] rents.
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,

    /// [`Payment`] covering the latest period of the [`Tenant`], if any.
    pub latest_payment: Option<Payment>,

    /// Projected [`Schedule`].
    pub schedule: Schedule,
}

/// Upcoming and overdue rent [`Payment`]s, grouped by urgency.
///
/// Every group is ordered by the next due date, the earliest first.
#[derive(Clone, Debug, Default)]
pub struct Upcoming {
    /// [`Entry`]s whose next [`Payment`] is overdue.
    pub overdue: Vec<Entry>,

    /// [`Entry`]s whose next [`Payment`] is due within the current calendar
    /// month, but isn't overdue yet.
    pub due_this_month: Vec<Entry>,

    /// [`Entry`]s whose next [`Payment`] is due within the next calendar
    /// month.
    pub due_next_month: Vec<Entry>,

    /// All the [`Entry`]s.
    pub all: Vec<Entry>,
}

impl Upcoming {
    /// Groups the provided [`Entry`]s by their urgency.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut all = entries.into_iter().collect::<Vec<_>>();
        all.sort_by_key(|e| e.schedule.next_due_date);

        let group = |pred: fn(&Schedule) -> bool| {
            all.iter()
                .filter(|e| pred(&e.schedule))
                .cloned()
                .collect::<Vec<_>>()
        };
        Self {
            overdue: group(|s| s.is_overdue),
            due_this_month: group(|s| s.is_due_this_month && !s.is_overdue),
            due_next_month: group(|s| s.is_due_next_month),
            all,
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{payment::Period, tenant::Schedule},
        fixture::{self, date},
    };

    use super::{Entry, Upcoming};

    fn entry(name: &str, start: &str, paid: Option<(&str, &str)>) -> Entry {
        let property = fixture::property("Sunset Villas");
        let unit = fixture::unit(&property, "Apartment 1");
        let tenant = fixture::tenant(&unit, name, start);
        let latest_payment =
            paid.map(|(from, to)| fixture::payment(&tenant, from, to));
        let schedule = Schedule::project(
            tenant.start_date,
            latest_payment.as_ref().map(|p| &p.period),
            date("2024-04-20"),
        )
        .unwrap();
        Entry {
            tenant,
            unit,
            property,
            latest_payment,
            schedule,
        }
    }

    fn names(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|e| e.tenant.name.to_string()).collect()
    }

    #[test]
    fn groups_by_urgency() {
        let upcoming = Upcoming::new([
            entry("Next Month", "2024-05-10", None),
            entry("Late", "2024-01-15", Some(("2024-02-15", "2024-04-14"))),
            entry("This Month", "2024-04-25", None),
            entry("Far", "2024-08-01", None),
            entry("Very Late", "2024-02-10", None),
        ]);

        assert_eq!(names(&upcoming.overdue), ["Very Late", "Late"]);
        assert_eq!(names(&upcoming.due_this_month), ["This Month"]);
        assert_eq!(names(&upcoming.due_next_month), ["Next Month"]);
        assert_eq!(
            names(&upcoming.all),
            ["Very Late", "Late", "This Month", "Next Month", "Far"],
        );
    }

    #[test]
    fn overdue_this_month_is_not_due_this_month() {
        let upcoming = Upcoming::new([entry(
            "Late",
            "2024-01-15",
            Some(("2024-02-15", "2024-04-14")),
        )]);

        let late = &upcoming.all[0];
        assert!(late.schedule.is_overdue);
        assert!(late.schedule.is_due_this_month);
        assert_eq!(upcoming.overdue.len(), 1);
        assert!(upcoming.due_this_month.is_empty());
    }

    #[test]
    fn empty() {
        let upcoming = Upcoming::new(Vec::new());

        assert!(upcoming.all.is_empty());
        assert!(upcoming.overdue.is_empty());
    }

    #[test]
    fn latest_period_drives_next_due_date() {
        let e = entry("Paid", "2024-01-15", Some(("2024-04-15", "2024-05-14")));

        assert_eq!(e.schedule.next_due_date, date("2024-05-15"));
        assert_eq!(
            e.latest_payment.map(|p| p.period),
            Some(Period {
                start: date("2024-04-15"),
                end: date("2024-05-14"),
            }),
        );
    }
}
