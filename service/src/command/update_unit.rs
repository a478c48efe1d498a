//! [`Command`] for updating a [`Unit`].

use common::{
    operations::{By, Select, Update},
    Amount,
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

/// [`Command`] for updating a [`Unit`].
#[derive(Clone, Debug)]
pub struct UpdateUnit {
    /// ID of the [`Unit`] to be updated.
    pub unit_id: unit::Id,

    /// ID of the [`Property`] the [`Unit`] should belong to.
    pub property_id: property::Id,

    /// New [`Code`] of the [`Unit`].
    pub code: unit::Code,

    /// New [`Name`] of the [`Unit`].
    pub name: unit::Name,

    /// New monthly rent of the [`Unit`].
    pub rent_amount: Amount,

    /// New [`Status`] of the [`Unit`].
    pub status: unit::Status,
}

impl<Db, M> Command<UpdateUnit> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Update<Unit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = read::unit::WithProperty;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateUnit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateUnit {
            unit_id,
            property_id,
            code,
            name,
            rent_amount,
            status,
        } = cmd;

        let mut unit = self
            .database()
            .execute(Select(By::<Option<Unit>, _>::new(unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())?;

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        unit.property_id = property_id;
        unit.code = code;
        unit.name = name;
        unit.rent_amount = rent_amount;
        unit.status = status;

        self.database()
            .execute(Update(unit.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(read::unit::WithProperty { unit, property })
    }
}

/// Error of [`UpdateUnit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Unit`] doesn't exist.
    #[display("`Unit(id: {_0})` does not exist")]
    #[from(ignore)]
    UnitNotExists(#[error(not(source))] unit::Id),
}
