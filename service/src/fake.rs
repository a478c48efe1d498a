//! In-memory infrastructure for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use common::operations::{By, Delete, Deliver, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{
        expense,
        payment::{self, Receipt},
        property, tenant, unit, Expense, Payment, Property, Tenant, Unit,
    },
    infra::{database, mailer, Database, Mailer},
    read, Config, Service,
};

/// Contents of a [`Memory`] database.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) properties: Vec<Property>,
    pub(crate) units: Vec<Unit>,
    pub(crate) tenants: Vec<Tenant>,
    pub(crate) payments: Vec<Payment>,
    pub(crate) expenses: Vec<Expense>,

    /// Indicator whether every [`Update`] fails.
    pub(crate) failing_updates: bool,
}

/// [`Database`] keeping everything in memory.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory(Arc<Mutex<State>>);

impl Memory {
    /// Locks the [`State`] of this [`Memory`].
    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }
}

/// [`Mailer`] recording the delivered [`Receipt`]s.
#[derive(Clone, Debug, Default)]
pub(crate) struct Outbox {
    /// Delivered [`Receipt`]s.
    sent: Arc<Mutex<Vec<Receipt>>>,

    /// Indicator whether every delivery fails.
    failing: bool,
}

impl Outbox {
    /// Creates a new [`Outbox`] failing every delivery.
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Returns the delivered [`Receipt`]s.
    pub(crate) fn sent(&self) -> Vec<Receipt> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer<Deliver<Receipt>> for Outbox {
    type Ok = ();
    type Err = Traced<mailer::Error>;

    async fn execute(
        &self,
        Deliver(receipt): Deliver<Receipt>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.failing {
            return Err(tracerr::new!(mailer::Error::InvalidAddress(
                receipt.recipient.to_string(),
            )));
        }
        self.sent.lock().unwrap().push(receipt);
        Ok(())
    }
}

/// Creates a new [`Service`] over the provided fakes.
pub(crate) fn service(db: &Memory, outbox: &Outbox) -> Service<Memory, Outbox> {
    Service::new(Config::default(), db.clone(), outbox.clone())
}

/// Implements [`Database`] operations of [`Memory`] for a domain entity.
macro_rules! impl_entity {
    ($entity:ty, $id:ty, $field:ident) => {
        impl Database<Select<By<Option<$entity>, $id>>> for Memory {
            type Ok = Option<$entity>;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<$entity>, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                Ok(self.state().$field.iter().find(|e| e.id == id).cloned())
            }
        }

        impl Database<Insert<$entity>> for Memory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Insert(entity): Insert<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.state().$field.push(entity);
                Ok(())
            }
        }

        impl Database<Update<$entity>> for Memory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Update(entity): Update<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                let mut state = self.state();
                if state.failing_updates {
                    return Err(tracerr::new!(database::Error::Unavailable));
                }
                if let Some(e) =
                    state.$field.iter_mut().find(|e| e.id == entity.id)
                {
                    *e = entity;
                } else {
                    state.$field.push(entity);
                }
                Ok(())
            }
        }

        impl Database<Delete<By<$entity, $id>>> for Memory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Delete(by): Delete<By<$entity, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                self.state().$field.retain(|e| e.id != id);
                Ok(())
            }
        }
    };
}

impl_entity!(Property, property::Id, properties);
impl_entity!(Unit, unit::Id, units);
impl_entity!(Tenant, tenant::Id, tenants);
impl_entity!(Payment, payment::Id, payments);
impl_entity!(Expense, expense::Id, expenses);

impl Database<Select<By<Option<read::unit::WithProperty>, unit::Id>>>
    for Memory
{
    type Ok = Option<read::unit::WithProperty>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::unit::WithProperty>, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let state = self.state();
        Ok(state.units.iter().find(|u| u.id == id).and_then(|unit| {
            Some(read::unit::WithProperty {
                property: state
                    .properties
                    .iter()
                    .find(|p| p.id == unit.property_id)?
                    .clone(),
                unit: unit.clone(),
            })
        }))
    }
}

impl Database<Select<By<Option<read::tenant::WithUnit>, tenant::Id>>>
    for Memory
{
    type Ok = Option<read::tenant::WithUnit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::tenant::WithUnit>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let tenant = self.state().tenants.iter().find(|t| t.id == id).cloned();
        let Some(tenant) = tenant else {
            return Ok(None);
        };
        Ok(self
            .execute(Select(By::<Option<read::unit::WithProperty>, _>::new(
                tenant.unit_id,
            )))
            .await?
            .map(|read::unit::WithProperty { unit, property }| {
                read::tenant::WithUnit {
                    tenant,
                    unit,
                    property,
                }
            }))
    }
}

impl Database<Select<By<read::tenant::ActiveCount, unit::Id>>> for Memory {
    type Ok = read::tenant::ActiveCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::tenant::ActiveCount, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let unit_id = by.into_inner();
        let count = self
            .state()
            .tenants
            .iter()
            .filter(|t| t.unit_id == unit_id)
            .filter(|t| t.status == tenant::Status::Active)
            .count();
        Ok(read::tenant::ActiveCount(
            i64::try_from(count).unwrap().into(),
        ))
    }
}

impl Database<Select<By<Option<Payment>, read::payment::LatestOf>>>
    for Memory
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, read::payment::LatestOf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::payment::LatestOf { tenant_id, except } = by.into_inner();
        Ok(self
            .state()
            .payments
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .filter(|p| Some(p.id) != except)
            .max_by_key(|p| p.period.end)
            .cloned())
    }
}

impl Database<Select<By<Vec<read::tenant::WithLatestPayment>, tenant::Status>>>
    for Memory
{
    type Ok = Vec<read::tenant::WithLatestPayment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::tenant::WithLatestPayment>, tenant::Status>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let status = by.into_inner();
        let ids = self
            .state()
            .tenants
            .iter()
            .filter(|t| t.status == status)
            .map(|t| t.id)
            .collect::<Vec<_>>();

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(read::tenant::WithUnit {
                tenant,
                unit,
                property,
            }) = self
                .execute(Select(By::<Option<read::tenant::WithUnit>, _>::new(
                    id,
                )))
                .await?
            else {
                continue;
            };
            let latest_payment = self
                .execute(Select(By::<Option<Payment>, _>::new(
                    read::payment::LatestOf {
                        tenant_id: id,
                        except: None,
                    },
                )))
                .await?;
            out.push(read::tenant::WithLatestPayment {
                tenant,
                unit,
                property,
                latest_payment,
            });
        }
        Ok(out)
    }
}
