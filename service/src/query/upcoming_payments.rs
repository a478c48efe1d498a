//! [`UpcomingPayments`] [`Query`] definition.

use common::{
    operations::{By, Select},
    DateTime,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::tenant::{self, Schedule},
    infra::{database, Database},
    read::{
        self,
        schedule::{Entry, Upcoming},
    },
    Service,
};
#[cfg(doc)]
use crate::domain::{Payment, Tenant};

use super::Query;

/// [`Query`] projecting the rent [`Schedule`]s of all the active [`Tenant`]s.
#[derive(Clone, Copy, Debug)]
pub struct UpcomingPayments {
    /// [`DateTime`] to project the [`Schedule`]s as of.
    ///
    /// Only its UTC calendar date matters.
    pub now: DateTime,
}

impl<Db, M> Query<UpcomingPayments> for Service<Db, M>
where
    Db: Database<
        Select<By<Vec<read::tenant::WithLatestPayment>, tenant::Status>>,
        Ok = Vec<read::tenant::WithLatestPayment>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Upcoming;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        UpcomingPayments { now }: UpcomingPayments,
    ) -> Result<Self::Ok, Self::Err> {
        let today = now.date();

        let tenants = self
            .database()
            .execute(Select(By::new(tenant::Status::Active)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Upcoming::new(tenants.into_iter().filter_map(
            |read::tenant::WithLatestPayment {
                 tenant,
                 unit,
                 property,
                 latest_payment,
             }| {
                let Some(schedule) = Schedule::project(
                    tenant.start_date,
                    latest_payment.as_ref().map(|p| &p.period),
                    today,
                ) else {
                    log::warn!(
                        "skipping `Tenant(id: {})`: its next due date is out \
                         of the supported range",
                        tenant.id,
                    );
                    return None;
                };
                Some(Entry {
                    tenant,
                    unit,
                    property,
                    latest_payment,
                    schedule,
                })
            },
        )))
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::tenant,
        fake::{self, Memory, Outbox},
        fixture::{self, date},
        Query as _,
    };

    use super::UpcomingPayments;

    #[tokio::test]
    async fn projects_active_tenants_only() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        let unit = fixture::unit(&property, "Apartment 1");
        let overdue = fixture::tenant(&unit, "Jane Doe", "2024-01-15");
        let paid = fixture::payment(&overdue, "2024-02-15", "2024-04-14");
        let newcomer = fixture::tenant(&unit, "John Doe", "2024-05-03");
        let mut former = fixture::tenant(&unit, "Old Tenant", "2023-01-01");
        former.status = tenant::Status::Inactive;
        {
            let mut state = db.state();
            state.properties.push(property);
            state.units.push(unit);
            state.tenants.extend([newcomer.clone(), overdue.clone(), former]);
            state.payments.push(paid);
        }
        let svc = fake::service(&db, &Outbox::default());

        let upcoming = svc
            .execute(UpcomingPayments {
                now: DateTime::from_rfc3339("2024-04-20T23:30:00Z").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(upcoming.all.len(), 2);
        assert_eq!(upcoming.all[0].tenant.id, overdue.id);
        assert_eq!(upcoming.all[0].schedule.next_due_date, date("2024-04-15"));
        assert_eq!(upcoming.all[0].schedule.days_overdue, 5);
        assert_eq!(upcoming.all[1].tenant.id, newcomer.id);

        assert_eq!(upcoming.overdue.len(), 1);
        assert!(upcoming.due_this_month.is_empty());
        assert_eq!(upcoming.due_next_month.len(), 1);
        assert_eq!(upcoming.due_next_month[0].tenant.id, newcomer.id);
    }
}
