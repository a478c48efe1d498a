//! [`Command`] for creating a new [`Expense`].

use common::{
    operations::{By, Insert, Select},
    Amount, Date, DateTime,
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

/// [`Command`] for creating a new [`Expense`] of a [`Property`].
#[derive(Clone, Debug)]
pub struct CreateExpense {
    /// ID of the [`Property`] the new [`Expense`] is made for.
    pub property_id: property::Id,

    /// [`Description`] of a new [`Expense`].
    pub description: expense::Description,

    /// Spent amount.
    pub amount: Amount,

    /// [`Category`] of a new [`Expense`].
    pub category: expense::Category,

    /// [`Date`] a new [`Expense`] was made on.
    pub date: Date,

    /// Additional [`Notes`] about a new [`Expense`].
    pub notes: Option<expense::Notes>,
}

impl<Db, M> Command<CreateExpense> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<Expense>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = read::expense::Detailed;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateExpense,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateExpense {
            property_id,
            description,
            amount,
            category,
            date,
            notes,
        } = cmd;

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let expense = Expense {
            id: expense::Id::new(),
            property_id,
            description,
            amount,
            category,
            date,
            notes,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(expense.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(read::expense::Detailed { expense, property })
    }
}

/// Error of [`CreateExpense`] [`Command`] execution.
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
        domain::{expense, property},
        fake::{self, Memory, Outbox},
        fixture::{self, amount, date},
        Command as _,
    };

    use super::{CreateExpense, ExecutionError};

    fn cmd(property_id: property::Id) -> CreateExpense {
        CreateExpense {
            property_id,
            description: expense::Description::new("Roof repair").unwrap(),
            amount: amount("350.25"),
            category: expense::Category::new("Repairs").unwrap(),
            date: date("2024-03-02"),
            notes: None,
        }
    }

    #[tokio::test]
    async fn records_expense_of_property() {
        let db = Memory::default();
        let property = fixture::property("Sunset Villas");
        db.state().properties.push(property.clone());
        let svc = fake::service(&db, &Outbox::default());

        let created = svc.execute(cmd(property.id)).await.unwrap();

        assert_eq!(created.property.id, property.id);
        assert_eq!(created.expense.amount, amount("350.25"));
        assert_eq!(db.state().expenses.len(), 1);
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
    }
}
