//! [`Command`] for updating a [`Tenant`].

use common::{
    operations::{By, Select, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{
    tenant::{Email, Name, Phone, Status},
    Unit,
};
use crate::{
    domain::{tenant, unit, Tenant},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for updating a [`Tenant`].
///
/// Doesn't touch the occupancy status of any [`Unit`].
#[derive(Clone, Debug)]
pub struct UpdateTenant {
    /// ID of the [`Tenant`] to be updated.
    pub tenant_id: tenant::Id,

    /// ID of the [`Unit`] the [`Tenant`] should rent.
    pub unit_id: unit::Id,

    /// New [`Name`] of the [`Tenant`].
    pub name: tenant::Name,

    /// New [`Email`] of the [`Tenant`].
    pub email: tenant::Email,

    /// New [`Phone`] of the [`Tenant`].
    pub phone: tenant::Phone,

    /// New lease start [`Date`] of the [`Tenant`].
    pub start_date: Date,

    /// New [`Status`] of the [`Tenant`].
    pub status: tenant::Status,
}

impl<Db, M> Command<UpdateTenant> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Tenant>, tenant::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<read::unit::WithProperty>, unit::Id>>,
            Ok = Option<read::unit::WithProperty>,
            Err = Traced<database::Error>,
        > + Database<Update<Tenant>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = read::tenant::WithUnit;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateTenant) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateTenant {
            tenant_id,
            unit_id,
            name,
            email,
            phone,
            start_date,
            status,
        } = cmd;

        let mut tenant = self
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

        tenant.unit_id = unit_id;
        tenant.name = name;
        tenant.email = email;
        tenant.phone = phone;
        tenant.start_date = start_date;
        tenant.status = status;

        self.database()
            .execute(Update(tenant.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(read::tenant::WithUnit {
            tenant,
            unit,
            property,
        })
    }
}

/// Error of [`UpdateTenant`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

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
        domain::{tenant, unit},
        fake::{self, Memory, Outbox},
        fixture, Command as _,
    };

    use super::UpdateTenant;

    #[tokio::test]
    async fn leaves_unit_status_untouched() {
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
        }
        let svc = fake::service(&db, &Outbox::default());

        let updated = svc
            .execute(UpdateTenant {
                tenant_id: tenant.id,
                unit_id: unit.id,
                name: tenant::Name::new("Jane Smith").unwrap(),
                email: tenant.email.clone(),
                phone: tenant.phone.clone(),
                start_date: tenant.start_date,
                status: tenant::Status::Inactive,
            })
            .await
            .unwrap();

        assert_eq!(updated.tenant.name.to_string(), "Jane Smith");
        assert_eq!(updated.tenant.created_at, tenant.created_at);

        let state = db.state();
        assert_eq!(state.tenants[0].status, tenant::Status::Inactive);
        assert_eq!(state.units[0].status, unit::Status::Occupied);
    }
}
