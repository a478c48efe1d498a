//! [`Command`] for creating a new [`Tenant`].

use common::{
    operations::{By, Insert, Select, Update},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::tenant::{Email, Name, Phone, Status};
use crate::{
    domain::{tenant, unit, Tenant, Unit},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Tenant`] renting a [`Unit`].
///
/// Marks the [`Unit`] as [`unit::Status::Occupied`] once the [`Tenant`] is
/// stored. Failing to do so doesn't fail the whole [`Command`], but is only
/// logged.
#[derive(Clone, Debug)]
pub struct CreateTenant {
    /// ID of the [`Unit`] the new [`Tenant`] rents.
    pub unit_id: unit::Id,

    /// [`Name`] of a new [`Tenant`].
    pub name: tenant::Name,

    /// [`Email`] of a new [`Tenant`].
    pub email: tenant::Email,

    /// [`Phone`] of a new [`Tenant`].
    pub phone: tenant::Phone,

    /// [`Date`] the lease of a new [`Tenant`] starts on.
    pub start_date: Date,

    /// Initial [`Status`] of a new [`Tenant`].
    pub status: tenant::Status,
}

impl<Db, M> Command<CreateTenant> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<read::unit::WithProperty>, unit::Id>>,
            Ok = Option<read::unit::WithProperty>,
            Err = Traced<database::Error>,
        > + Database<Insert<Tenant>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Unit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = read::tenant::WithUnit;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateTenant) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateTenant {
            unit_id,
            name,
            email,
            phone,
            start_date,
            status,
        } = cmd;

        let read::unit::WithProperty { mut unit, property } = self
            .database()
            .execute(Select(By::<Option<read::unit::WithProperty>, _>::new(
                unit_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;

        let tenant = Tenant {
            id: tenant::Id::new(),
            unit_id,
            name,
            email,
            phone,
            start_date,
            status,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(tenant.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let previous = unit.status;
        unit.status = unit::Status::Occupied;
        if let Err(e) = self.database().execute(Update(unit.clone())).await {
            log::error!(
                "failed to mark `Unit(id: {unit_id})` as occupied after \
                 creating `Tenant(id: {})`: {e}",
                tenant.id,
            );
            unit.status = previous;
        }

        Ok(read::tenant::WithUnit {
            tenant,
            unit,
            property,
        })
    }
}

/// Error of [`CreateTenant`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Unit`] doesn't exist.
    #[display("`Unit(id: {_0})` does not exist")]
    #[from(ignore)]
    UnitNotExists(#[error(not(source))] unit::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{tenant, unit},
        fake::{self, Memory, Outbox},
        fixture, Command as _,
    };

    use super::{CreateTenant, ExecutionError};

    fn cmd(unit_id: unit::Id) -> CreateTenant {
        CreateTenant {
            unit_id,
            name: tenant::Name::new("Jane Doe").unwrap(),
            email: tenant::Email::new("jane@example.com").unwrap(),
            phone: tenant::Phone::new("+256 700 000000").unwrap(),
            start_date: fixture::date("2024-01-15"),
            status: tenant::Status::default(),
        }
    }

    #[tokio::test]
    async fn occupies_unit() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        let unit = fixture::unit(&property, "Apartment 1");
        db.state().properties.push(property);
        db.state().units.push(unit.clone());
        let svc = fake::service(&db, &Outbox::default());

        let created = svc.execute(cmd(unit.id)).await.unwrap();

        assert_eq!(created.tenant.unit_id, unit.id);
        assert_eq!(created.tenant.status, tenant::Status::Active);
        assert_eq!(created.unit.status, unit::Status::Occupied);

        let state = db.state();
        assert_eq!(state.tenants.len(), 1);
        assert_eq!(state.units[0].status, unit::Status::Occupied);
    }

    #[tokio::test]
    async fn occupies_unit_even_for_inactive_tenant() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        let unit = fixture::unit(&property, "Apartment 1");
        db.state().properties.push(property);
        db.state().units.push(unit.clone());
        let svc = fake::service(&db, &Outbox::default());

        svc.execute(CreateTenant {
            status: tenant::Status::Inactive,
            ..cmd(unit.id)
        })
        .await
        .unwrap();

        assert_eq!(db.state().units[0].status, unit::Status::Occupied);
    }

    #[tokio::test]
    async fn keeps_tenant_when_unit_is_not_occupied() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        let unit = fixture::unit(&property, "Apartment 1");
        {
            let mut state = db.state();
            state.properties.push(property);
            state.units.push(unit.clone());
            state.failing_updates = true;
        }
        let svc = fake::service(&db, &Outbox::default());

        let created = svc.execute(cmd(unit.id)).await.unwrap();

        assert_eq!(created.unit.status, unit::Status::Vacant);

        let state = db.state();
        assert_eq!(state.tenants.len(), 1);
        assert_eq!(state.tenants[0].id, created.tenant.id);
        assert_eq!(state.units[0].status, unit::Status::Vacant);
    }

    #[tokio::test]
    async fn errors_on_unknown_unit() {
        let db = Memory::default();
        let svc = fake::service(&db, &Outbox::default());
        let id = unit::Id::new();

        let err = svc.execute(cmd(id)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UnitNotExists(i) if *i == id,
        ));
        assert!(db.state().tenants.is_empty());
    }
}
