//! [`Command`] for creating a new [`Unit`].

use common::{
    operations::{By, Insert, Select},
    Amount, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::unit::{Code, Name, Status};
use crate::{
    domain::{property, unit, Property, Unit},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Unit`] of a [`Property`].
#[derive(Clone, Debug)]
pub struct CreateUnit {
    /// ID of the [`Property`] the new [`Unit`] belongs to.
    pub property_id: property::Id,

    /// [`Code`] of a new [`Unit`].
    pub code: unit::Code,

    /// [`Name`] of a new [`Unit`].
    pub name: unit::Name,

    /// Monthly rent of a new [`Unit`].
    pub rent_amount: Amount,

    /// Initial [`Status`] of a new [`Unit`].
    pub status: unit::Status,
}

impl<Db, M> Command<CreateUnit> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<Unit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = read::unit::WithProperty;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUnit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUnit {
            property_id,
            code,
            name,
            rent_amount,
            status,
        } = cmd;

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let unit = Unit {
            id: unit::Id::new(),
            property_id,
            code,
            name,
            rent_amount,
            status,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(unit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(read::unit::WithProperty { unit, property })
    }
}

/// Error of [`CreateUnit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{property, unit},
        fake::{self, Memory, Outbox},
        fixture, Command as _,
    };

    use super::{CreateUnit, ExecutionError};

    fn cmd(property_id: property::Id) -> CreateUnit {
        CreateUnit {
            property_id,
            code: unit::Code::new("B-2").unwrap(),
            name: unit::Name::new("Apartment 2").unwrap(),
            rent_amount: fixture::amount("950"),
            status: unit::Status::default(),
        }
    }

    #[tokio::test]
    async fn attaches_to_property() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        db.state().properties.push(property.clone());
        let svc = fake::service(&db, &Outbox::default());

        let created = svc.execute(cmd(property.id)).await.unwrap();

        assert_eq!(created.property.id, property.id);
        assert_eq!(created.unit.status, unit::Status::Vacant);
        assert_eq!(db.state().units.len(), 1);
    }

    #[tokio::test]
    async fn errors_on_unknown_property() {
        let db = Memory::default();
        let svc = fake::service(&db, &Outbox::default());
        let id = property::Id::new();

        let err = svc.execute(cmd(id)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PropertyNotExists(i) if *i == id,
        ));
        assert!(db.state().units.is_empty());
    }
}
