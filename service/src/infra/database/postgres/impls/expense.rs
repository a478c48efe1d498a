//! [`Expense`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{expense, Expense},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::{property, Aliased};

/// Reads an [`Expense`] from the provided [`Aliased`] row.
pub(super) fn from_row(row: Aliased<'_>) -> Expense {
    Expense {
        id: row.get("id"),
        property_id: row.get("property_id"),
        description: row.get("description"),
        amount: row.get("amount"),
        category: row.get("category"),
        date: row.get("date"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Expense>, expense::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Expense>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Expense>, expense::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: expense::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            expense_columns!("e"),
            " FROM expenses e \
              WHERE e.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(Aliased::new(&row, "e"))))
    }
}

impl<C> Database<Insert<Expense>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Expense>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(expense): Insert<Expense>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(expense))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Expense>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(expense): Update<Expense>,
    ) -> Result<Self::Ok, Self::Err> {
        let Expense {
            id,
            property_id,
            description,
            amount,
            category,
            date,
            notes,
            created_at,
        } = expense;

        const SQL: &str = "\
            INSERT INTO expenses (\
                id, property_id, description, amount, category, date, notes, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::NUMERIC, $5::VARCHAR, \
                $6::DATE, $7::VARCHAR, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET property_id = EXCLUDED.property_id, \
                description = EXCLUDED.description, \
                amount = EXCLUDED.amount, \
                category = EXCLUDED.category, \
                date = EXCLUDED.date, \
                notes = EXCLUDED.notes";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &description,
                &amount,
                &category,
                &date,
                &notes,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Expense, expense::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Expense, expense::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: expense::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM expenses \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<read::expense::Detailed>, expense::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::expense::Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::expense::Detailed>, expense::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: expense::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            expense_columns!("e"),
            ", ",
            property_columns!("p"),
            " FROM expenses e \
              JOIN properties p ON p.id = e.property_id \
              WHERE e.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| read::expense::Detailed {
                expense: from_row(Aliased::new(&row, "e")),
                property: property::from_row(Aliased::new(&row, "p")),
            }))
    }
}

impl<C>
    Database<
        Select<By<Vec<read::expense::Detailed>, read::expense::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::expense::Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::expense::Detailed>, read::expense::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::expense::list::Filter { property_id } = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            expense_columns!("e"),
            ", ",
            property_columns!("p"),
            " FROM expenses e \
              JOIN properties p ON p.id = e.property_id \
              WHERE ($1::UUID IS NULL OR e.property_id = $1::UUID) \
              ORDER BY e.date DESC, e.created_at DESC",
        );
        Ok(self
            .query(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::expense::Detailed {
                expense: from_row(Aliased::new(row, "e")),
                property: property::from_row(Aliased::new(row, "p")),
            })
            .collect())
    }
}
