//! [`Command`] for updating an [`Expense`].

use common::{
    operations::{By, Select, Update},
    Amount, Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::expense::{Category, Description, Notes};
use crate::{
    domain::{expense, property, Expense, Property},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for updating an [`Expense`].
#[derive(Clone, Debug)]
pub struct UpdateExpense {
    /// ID of the [`Expense`] to be updated.
    pub expense_id: expense::Id,

    /// ID of the [`Property`] the [`Expense`] is made for.
    pub property_id: property::Id,

    /// New [`Description`] of the [`Expense`].
    pub description: expense::Description,

    /// New spent amount.
    pub amount: Amount,

    /// New [`Category`] of the [`Expense`].
    pub category: expense::Category,

    /// New [`Date`] the [`Expense`] was made on.
    pub date: Date,

    /// New [`Notes`] about the [`Expense`].
    pub notes: Option<expense::Notes>,
}

impl<Db, M> Command<UpdateExpense> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Expense>, expense::Id>>,
            Ok = Option<Expense>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Update<Expense>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = read::expense::Detailed;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateExpense,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateExpense {
            expense_id,
            property_id,
            description,
            amount,
            category,
            date,
            notes,
        } = cmd;

        let mut expense = self
            .database()
            .execute(Select(By::<Option<Expense>, _>::new(expense_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ExpenseNotExists(expense_id))
            .map_err(tracerr::wrap!())?;

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        expense.property_id = property_id;
        expense.description = description;
        expense.amount = amount;
        expense.category = category;
        expense.date = date;
        expense.notes = notes;

        self.database()
            .execute(Update(expense.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(read::expense::Detailed { expense, property })
    }
}

/// Error of [`UpdateExpense`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Expense`] doesn't exist.
    #[display("`Expense(id: {_0})` does not exist")]
    #[from(ignore)]
    ExpenseNotExists(#[error(not(source))] expense::Id),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}
