//! [`Command`] for updating a [`Payment`].

use common::{
    operations::{By, Select, Update},
    Amount, Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{
    payment::{Method, Notes, Reference, Status},
    Unit,
};
use crate::{
    domain::{
        payment::{self, MonthsCovered, Period},
        tenant, unit, Payment, Tenant,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for updating a [`Payment`].
///
/// The [`Period`] of the [`Payment`] is recomputed the same way as when it's
/// recorded, considering every other [`Payment`] of the [`Tenant`]. Its
/// [`Status`] and receipt delivery flag are preserved.
#[derive(Clone, Debug)]
pub struct UpdatePayment {
    /// ID of the [`Payment`] to be updated.
    pub payment_id: payment::Id,

    /// ID of the [`Tenant`] who made the [`Payment`].
    pub tenant_id: tenant::Id,

    /// ID of the [`Unit`] the [`Payment`] is made for.
    pub unit_id: unit::Id,

    /// Paid amount.
    pub amount: Amount,

    /// [`Date`] the [`Payment`] was made on.
    pub payment_date: Date,

    /// Number of calendar months the [`Payment`] covers.
    pub months_covered: MonthsCovered,

    /// [`Method`] the [`Payment`] was made with.
    pub method: Option<payment::Method>,

    /// External [`Reference`] of the [`Payment`].
    pub reference: Option<payment::Reference>,

    /// Additional [`Notes`] about the [`Payment`].
    pub notes: Option<payment::Notes>,
}

impl<Db, M> Command<UpdatePayment> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, tenant::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<read::unit::WithProperty>, unit::Id>>,
            Ok = Option<read::unit::WithProperty>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Payment>, read::payment::LatestOf>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<Update<Payment>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = read::payment::Detailed;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdatePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePayment {
            payment_id,
            tenant_id,
            unit_id,
            amount,
            payment_date,
            months_covered,
            method,
            reference,
            notes,
        } = cmd;

        let mut payment = self
            .database()
            .execute(Select(By::<Option<Payment>, _>::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())?;

        let tenant = self
            .database()
            .execute(Select(By::<Option<Tenant>, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TenantNotExists(tenant_id))
            .map_err(tracerr::wrap!())?;

        let read::unit::WithProperty { unit, property } = self
            .database()
            .execute(Select(By::<Option<read::unit::WithProperty>, _>::new(
                unit_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;

        let latest = self
            .database()
            .execute(Select(By::<Option<Payment>, _>::new(
                read::payment::LatestOf {
                    tenant_id,
                    except: Some(payment_id),
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let period = Period::seed(
            latest.as_ref().map(|p| &p.period),
            tenant.start_date,
        )
        .and_then(|start| Period::covering(start, months_covered))
        .ok_or(E::PeriodOutOfRange)
        .map_err(tracerr::wrap!())?;

        payment.tenant_id = tenant_id;
        payment.unit_id = unit_id;
        payment.amount = amount;
        payment.payment_date = payment_date;
        payment.months_covered = months_covered;
        payment.period = period;
        payment.method = method;
        payment.reference = reference;
        payment.notes = notes;

        self.database()
            .execute(Update(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(read::payment::Detailed {
            payment,
            tenant,
            unit,
            property,
        })
    }
}

/// Error of [`UpdatePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Payment`] doesn't exist.
    #[display("`Payment(id: {_0})` does not exist")]
    #[from(ignore)]
    PaymentNotExists(#[error(not(source))] payment::Id),

    /// [`Period`] of the [`Payment`] falls out of the supported [`Date`]
    /// range.
    #[display("`Payment` period is out of the supported date range")]
    #[from(ignore)]
    PeriodOutOfRange,

    /// [`Tenant`] doesn't exist.
    #[display("`Tenant(id: {_0})` does not exist")]
    #[from(ignore)]
    TenantNotExists(#[error(not(source))] tenant::Id),

    /// [`Unit`] doesn't exist.
    #[display("`Unit(id: {_0})` does not exist")]
    #[from(ignore)]
    UnitNotExists(#[error(not(source))] unit::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            payment::{self, MonthsCovered, Period},
            Payment, Tenant,
        },
        fake::{self, Memory, Outbox},
        fixture::{self, amount, date},
        Command as _,
    };

    use super::{ExecutionError, UpdatePayment};

    fn cmd(payment: &Payment, months: i32) -> UpdatePayment {
        UpdatePayment {
            payment_id: payment.id,
            tenant_id: payment.tenant_id,
            unit_id: payment.unit_id,
            amount: amount("2400"),
            payment_date: payment.payment_date,
            months_covered: MonthsCovered::new(months).unwrap(),
            method: None,
            reference: None,
            notes: None,
        }
    }

    fn seeded(db: &Memory) -> Tenant {
        let property = fixture::property("Sunset Villas");
        let unit = fixture::unit(&property, "Apartment 1");
        let tenant = fixture::tenant(&unit, "Jane Doe", "2024-01-15");
        let mut state = db.state();
        state.properties.push(property);
        state.units.push(unit);
        state.tenants.push(tenant.clone());
        tenant
    }

    #[tokio::test]
    async fn recomputes_period_excluding_itself() {
        let db = Memory::default();
        let tenant = seeded(&db);
        let first = fixture::payment(&tenant, "2024-01-15", "2024-02-14");
        let mut second = fixture::payment(&tenant, "2024-02-15", "2024-03-14");
        second.receipt_sent = true;
        db.state().payments.extend([first, second.clone()]);
        let svc = fake::service(&db, &Outbox::default());

        let updated = svc.execute(cmd(&second, 2)).await.unwrap();

        assert_eq!(
            updated.payment.period,
            Period {
                start: date("2024-02-15"),
                end: date("2024-04-14"),
            },
        );
        assert!(updated.payment.receipt_sent);
        assert_eq!(updated.payment.status, payment::Status::Completed);
        assert_eq!(updated.payment.created_at, second.created_at);
        assert_eq!(db.state().payments[1].amount, amount("2400"));
    }

    #[tokio::test]
    async fn only_payment_restarts_from_lease_start() {
        let db = Memory::default();
        let tenant = seeded(&db);
        let only = fixture::payment(&tenant, "2024-03-15", "2024-04-14");
        db.state().payments.push(only.clone());
        let svc = fake::service(&db, &Outbox::default());

        let updated = svc.execute(cmd(&only, 1)).await.unwrap();

        assert_eq!(updated.payment.period.start, date("2024-01-15"));
    }

    #[tokio::test]
    async fn errors_on_unknown_payment() {
        let db = Memory::default();
        let tenant = seeded(&db);
        let ghost = fixture::payment(&tenant, "2024-01-15", "2024-02-14");
        let svc = fake::service(&db, &Outbox::default());

        let err = svc.execute(cmd(&ghost, 1)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentNotExists(id) if *id == ghost.id,
        ));
    }
}
