//! [`Command`] for deleting a [`Tenant`].

use common::operations::{By, Delete, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Payment;
use crate::{
    domain::{tenant, unit, Tenant, Unit},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`Tenant`] along with its [`Payment`]s.
///
/// Marks the rented [`Unit`] as [`unit::Status::Vacant`] if no active
/// [`Tenant`]s remain in it. Failing to do so doesn't fail the whole
/// [`Command`], but is only logged.
#[derive(Clone, Copy, Debug)]
pub struct DeleteTenant {
    /// ID of the [`Tenant`] to be deleted.
    pub tenant_id: tenant::Id,
}

impl<Db, M> Command<DeleteTenant> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Tenant>, tenant::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Tenant, tenant::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::tenant::ActiveCount, unit::Id>>,
            Ok = read::tenant::ActiveCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Update<Unit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteTenant) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteTenant { tenant_id } = cmd;

        let tenant = self
            .database()
            .execute(Select(By::<Option<Tenant>, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TenantNotExists(tenant_id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Delete(By::<Tenant, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Err(e) = self.vacate_if_unoccupied(tenant.unit_id).await {
            log::error!(
                "failed to update `Unit(id: {})` status after deleting \
                 `Tenant(id: {tenant_id})`: {e}",
                tenant.unit_id,
            );
        }

        Ok(())
    }
}

impl<Db, M> Service<Db, M>
where
    Db: Database<
            Select<By<read::tenant::ActiveCount, unit::Id>>,
            Ok = read::tenant::ActiveCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<Update<Unit>, Ok = (), Err = Traced<database::Error>>,
{
    /// Marks the [`Unit`] as [`unit::Status::Vacant`] if it has no active
    /// [`Tenant`]s anymore.
    async fn vacate_if_unoccupied(
        &self,
        unit_id: unit::Id,
    ) -> Result<(), Traced<database::Error>> {
        let read::tenant::ActiveCount(active) = self
            .database()
            .execute(Select(By::<read::tenant::ActiveCount, _>::new(unit_id)))
            .await
            .map_err(tracerr::wrap!())?;
        if active != 0 {
            return Ok(());
        }

        let unit = self
            .database()
            .execute(Select(By::<Option<Unit>, _>::new(unit_id)))
            .await
            .map_err(tracerr::wrap!())?;
        if let Some(mut unit) = unit {
            unit.status = unit::Status::Vacant;
            self.database()
                .execute(Update(unit))
                .await
                .map_err(tracerr::wrap!())?;
        }
        Ok(())
    }
}

/// Error of [`DeleteTenant`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Tenant`] doesn't exist.
    #[display("`Tenant(id: {_0})` does not exist")]
    #[from(ignore)]
    TenantNotExists(#[error(not(source))] tenant::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{tenant, unit},
        fake::{self, Memory, Outbox},
        fixture, Command as _,
    };

    use super::{DeleteTenant, ExecutionError};

    #[tokio::test]
    async fn vacates_unit_left_without_active_tenants() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        let mut unit = fixture::unit(&property, "Apartment 1");
        unit.status = unit::Status::Occupied;
        let tenant = fixture::tenant(&unit, "Jane Doe", "2024-01-15");
        let mut former = fixture::tenant(&unit, "John Doe", "2023-01-15");
        former.status = tenant::Status::Inactive;
        {
            let mut state = db.state();
            state.properties.push(property);
            state.units.push(unit.clone());
            state.tenants.extend([tenant.clone(), former]);
        }
        let svc = fake::service(&db, &Outbox::default());

        svc.execute(DeleteTenant {
            tenant_id: tenant.id,
        })
        .await
        .unwrap();

        let state = db.state();
        assert_eq!(state.tenants.len(), 1);
        assert_eq!(state.units[0].status, unit::Status::Vacant);
    }

    #[tokio::test]
    async fn keeps_unit_occupied_by_other_active_tenant() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        let mut unit = fixture::unit(&property, "Apartment 1");
        unit.status = unit::Status::Occupied;
        let tenant = fixture::tenant(&unit, "Jane Doe", "2024-01-15");
        let roommate = fixture::tenant(&unit, "John Doe", "2024-02-01");
        {
            let mut state = db.state();
            state.properties.push(property);
            state.units.push(unit.clone());
            state.tenants.extend([tenant.clone(), roommate]);
        }
        let svc = fake::service(&db, &Outbox::default());

        svc.execute(DeleteTenant {
            tenant_id: tenant.id,
        })
        .await
        .unwrap();

        assert_eq!(db.state().units[0].status, unit::Status::Occupied);
    }

    #[tokio::test]
    async fn deletes_tenant_when_unit_is_not_vacated() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        let mut unit = fixture::unit(&property, "Apartment 1");
        unit.status = unit::Status::Occupied;
        let tenant = fixture::tenant(&unit, "Jane Doe", "2024-01-15");
        {
            let mut state = db.state();
            state.properties.push(property);
            state.units.push(unit.clone());
            state.tenants.push(tenant.clone());
            state.failing_updates = true;
        }
        let svc = fake::service(&db, &Outbox::default());

        svc.execute(DeleteTenant {
            tenant_id: tenant.id,
        })
        .await
        .unwrap();

        let state = db.state();
        assert!(state.tenants.is_empty());
        assert_eq!(state.units[0].status, unit::Status::Occupied);
    }

    #[tokio::test]
    async fn errors_on_unknown_tenant() {
        let db = Memory::default();
        let svc = fake::service(&db, &Outbox::default());
        let id = tenant::Id::new();

        let err = svc.execute(DeleteTenant { tenant_id: id }).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::TenantNotExists(i) if *i == id,
        ));
    }
}
