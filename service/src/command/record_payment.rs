//! [`Command`] for recording a new [`Payment`].

use common::{
    operations::{By, Deliver, Insert, Select, Update},
    Amount, Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{
    payment::{Method, Notes, Reference},
    Unit,
};
use crate::{
    domain::{
        payment::{self, MonthsCovered, Period, Receipt},
        tenant, unit, Payment, Tenant,
    },
    infra::{database, mailer, Database, Mailer},
    read, Service,
};

use super::Command;

/// [`Command`] for recording a new rent [`Payment`] of a [`Tenant`].
///
/// The [`Period`] of the [`Payment`] continues right after the latest one
/// paid by the [`Tenant`], or starts on the lease start if there is none.
///
/// Once the [`Payment`] is stored, its [`Receipt`] is delivered to the
/// [`Tenant`]. Failing to deliver it doesn't fail the whole [`Command`], but
/// is reported in its [`Output`].
#[derive(Clone, Debug)]
pub struct RecordPayment {
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

/// Output of [`RecordPayment`] [`Command`] execution.
#[derive(Debug)]
pub struct Output {
    /// Recorded [`Payment`].
    ///
    /// Its `receipt_sent` flag tells whether the [`Receipt`] was delivered.
    pub payment: read::payment::Detailed,

    /// Error of delivering the [`Receipt`], if it failed.
    pub delivery_error: Option<Traced<mailer::Error>>,
}

impl<Db, M> Command<RecordPayment> for Service<Db, M>
where
    Db: Database<
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
        > + Database<Insert<Payment>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Payment>, Ok = (), Err = Traced<database::Error>>,
    M: Mailer<Deliver<Receipt>, Ok = (), Err = Traced<mailer::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordPayment {
            tenant_id,
            unit_id,
            amount,
            payment_date,
            months_covered,
            method,
            reference,
            notes,
        } = cmd;

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
                    except: None,
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

        let mut payment = Payment {
            id: payment::Id::new(),
            tenant_id,
            unit_id,
            amount,
            payment_date,
            months_covered,
            period,
            method,
            reference,
            notes,
            status: payment::Status::Completed,
            receipt_sent: false,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let receipt = Receipt::new(
            &payment,
            &tenant,
            &unit,
            &property,
            self.config().currency,
        );
        let delivery_error = match self.mailer().execute(Deliver(receipt)).await
        {
            Ok(()) => {
                payment.receipt_sent = true;
                if let Err(e) =
                    self.database().execute(Update(payment.clone())).await
                {
                    log::error!(
                        "failed to mark receipt of `Payment(id: {})` as \
                         sent: {e}",
                        payment.id,
                    );
                }
                None
            }
            Err(e) => {
                log::warn!(
                    "failed to deliver receipt of `Payment(id: {})` to \
                     `Tenant(id: {tenant_id})`: {e}",
                    payment.id,
                );
                Some(e)
            }
        };

        Ok(Output {
            payment: read::payment::Detailed {
                payment,
                tenant,
                unit,
                property,
            },
            delivery_error,
        })
    }
}

/// Error of [`RecordPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

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
            payment::{MonthsCovered, Period},
            tenant, unit, Property, Tenant, Unit,
        },
        fake::{self, Memory, Outbox},
        fixture::{self, amount, date},
        Command as _,
    };

    use super::{ExecutionError, RecordPayment};

    fn seeded(db: &Memory) -> (Property, Unit, Tenant) {
        let property = fixture::property("Sunset Villas");
        let unit = fixture::unit(&property, "Apartment 1");
        let tenant = fixture::tenant(&unit, "Jane Doe", "2024-01-15");
        let mut state = db.state();
        state.properties.push(property.clone());
        state.units.push(unit.clone());
        state.tenants.push(tenant.clone());
        (property, unit, tenant)
    }

    fn cmd(tenant: &Tenant, months: i32) -> RecordPayment {
        RecordPayment {
            tenant_id: tenant.id,
            unit_id: tenant.unit_id,
            amount: amount("1200"),
            payment_date: date("2024-01-20"),
            months_covered: MonthsCovered::new(months).unwrap(),
            method: None,
            reference: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn first_payment_starts_on_lease_start() {
        let db = Memory::default();
        let outbox = Outbox::default();
        let (property, _, tenant) = seeded(&db);
        let svc = fake::service(&db, &outbox);

        let out = svc.execute(cmd(&tenant, 1)).await.unwrap();

        assert!(out.delivery_error.is_none());
        assert_eq!(
            out.payment.payment.period,
            Period {
                start: date("2024-01-15"),
                end: date("2024-02-14"),
            },
        );
        assert!(out.payment.payment.receipt_sent);
        assert_eq!(out.payment.property.id, property.id);

        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, tenant.email);
        assert_eq!(sent[0].number, out.payment.payment.id.to_string());

        let state = db.state();
        assert_eq!(state.payments.len(), 1);
        assert!(state.payments[0].receipt_sent);
    }

    #[tokio::test]
    async fn continues_after_latest_period() {
        let db = Memory::default();
        let (_, _, tenant) = seeded(&db);
        let svc = fake::service(&db, &Outbox::default());

        svc.execute(cmd(&tenant, 1)).await.unwrap();
        let out = svc.execute(cmd(&tenant, 2)).await.unwrap();

        assert_eq!(
            out.payment.payment.period,
            Period {
                start: date("2024-02-15"),
                end: date("2024-04-14"),
            },
        );
    }

    #[tokio::test]
    async fn clamps_month_end_lease() {
        let db = Memory::default();
        let (_, unit, _) = seeded(&db);
        let tenant = fixture::tenant(&unit, "John Doe", "2024-01-31");
        db.state().tenants.push(tenant.clone());
        let svc = fake::service(&db, &Outbox::default());

        let out = svc.execute(cmd(&tenant, 1)).await.unwrap();

        assert_eq!(out.payment.payment.period.end, date("2024-02-28"));
    }

    #[tokio::test]
    async fn survives_delivery_failure() {
        let db = Memory::default();
        let (_, _, tenant) = seeded(&db);
        let svc = fake::service(&db, &Outbox::failing());

        let out = svc.execute(cmd(&tenant, 1)).await.unwrap();

        assert!(out.delivery_error.is_some());
        assert!(!out.payment.payment.receipt_sent);

        let state = db.state();
        assert_eq!(state.payments.len(), 1);
        assert!(!state.payments[0].receipt_sent);
    }

    #[tokio::test]
    async fn errors_on_unknown_tenant() {
        let db = Memory::default();
        let (_, unit, _) = seeded(&db);
        let stranger = fixture::tenant(&unit, "Nobody", "2024-01-01");
        let outbox = Outbox::default();
        let svc = fake::service(&db, &outbox);

        let err = svc.execute(cmd(&stranger, 1)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::TenantNotExists(id) if *id == stranger.id,
        ));
        assert!(db.state().payments.is_empty());
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn errors_on_unknown_unit() {
        let db = Memory::default();
        let (_, _, tenant) = seeded(&db);
        let outbox = Outbox::default();
        let svc = fake::service(&db, &outbox);
        let unit_id = unit::Id::new();

        let err = svc
            .execute(RecordPayment {
                unit_id,
                ..cmd(&tenant, 1)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UnitNotExists(id) if *id == unit_id,
        ));
        assert!(db.state().payments.is_empty());
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn uses_lease_start_of_inactive_tenant() {
        let db = Memory::default();
        let (_, unit, _) = seeded(&db);
        let mut tenant = fixture::tenant(&unit, "John Doe", "2023-06-01");
        tenant.status = tenant::Status::Inactive;
        db.state().tenants.push(tenant.clone());
        let svc = fake::service(&db, &Outbox::default());

        let out = svc.execute(cmd(&tenant, 1)).await.unwrap();

        assert_eq!(out.payment.payment.period.start, date("2023-06-01"));
    }
}
