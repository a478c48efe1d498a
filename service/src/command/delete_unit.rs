//! [`Command`] for deleting a [`Unit`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Payment, Tenant};
use crate::{
    domain::{unit, Unit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Unit`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteUnit {
    /// ID of the [`Unit`] to be deleted.
    pub unit_id: unit::Id,
}

impl<Db, M> Command<DeleteUnit> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Unit>, unit::Id>>,
            Ok = Option<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Unit, unit::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteUnit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteUnit { unit_id } = cmd;

        self.database()
            .execute(Select(By::<Option<Unit>, _>::new(unit_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UnitNotExists(unit_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        self.database()
            .execute(Delete(By::<Unit, _>::new(unit_id)))
            .await
            .map_err(|e| {
                if e.as_ref().is_foreign_key_violation() {
                    tracerr::new!(E::UnitInUse(unit_id))
                } else {
                    tracerr::map_from(e)
                }
            })
    }
}

/// Error of [`DeleteUnit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Unit`] still has [`Tenant`]s or [`Payment`]s referencing it.
    #[display("`Unit(id: {_0})` is still referenced")]
    #[from(ignore)]
    UnitInUse(#[error(not(source))] unit::Id),

    /// [`Unit`] doesn't exist.
    #[display("`Unit(id: {_0})` does not exist")]
    #[from(ignore)]
    UnitNotExists(#[error(not(source))] unit::Id),
}
