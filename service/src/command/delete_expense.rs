//! [`Command`] for deleting an [`Expense`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{expense, Expense},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Expense`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteExpense {
    /// ID of the [`Expense`] to be deleted.
    pub expense_id: expense::Id,
}

impl<Db, M> Command<DeleteExpense> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Expense>, expense::Id>>,
            Ok = Option<Expense>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Expense, expense::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteExpense,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteExpense { expense_id } = cmd;

        self.database()
            .execute(Select(By::<Option<Expense>, _>::new(expense_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ExpenseNotExists(expense_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        self.database()
            .execute(Delete(By::<Expense, _>::new(expense_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeleteExpense`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Expense`] doesn't exist.
    #[display("`Expense(id: {_0})` does not exist")]
    #[from(ignore)]
    ExpenseNotExists(#[error(not(source))] expense::Id),
}
