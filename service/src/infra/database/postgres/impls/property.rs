//! [`Property`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{property, Expense, Property, Unit},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::{expense, unit, Aliased};

/// Reads a [`Property`] from the provided [`Aliased`] row.
pub(super) fn from_row(row: Aliased<'_>) -> Property {
    Property {
        id: row.get("id"),
        code: row.get("code"),
        name: row.get("name"),
        address: row.get("address"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            property_columns!("p"),
            " FROM properties p \
              WHERE p.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(Aliased::new(&row, "p"))))
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            code,
            name,
            address,
            description,
            created_at,
        } = property;

        const SQL: &str = "\
            INSERT INTO properties (\
                id, code, name, address, description, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET code = EXCLUDED.code, \
                name = EXCLUDED.name, \
                address = EXCLUDED.address, \
                description = EXCLUDED.description";
        self.exec(
            SQL,
            &[&id, &code, &name, &address, &description, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM properties \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::property::Summary>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::property::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<read::property::Summary>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = concat!(
            "SELECT ",
            property_columns!("p"),
            ", (SELECT COUNT(*) FROM units u \
                WHERE u.property_id = p.id) AS units_count, \
               (SELECT COUNT(*) FROM expenses e \
                WHERE e.property_id = p.id) AS expenses_count \
             FROM properties p \
             ORDER BY p.created_at DESC",
        );
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| read::property::Summary {
                property: from_row(Aliased::new(&row, "p")),
                units_count: row.get::<_, i64>("units_count").into(),
                expenses_count: row.get::<_, i64>("expenses_count").into(),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<read::property::Detailed>, property::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Property>, property::Id>>,
        Ok = Option<Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<read::property::Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::property::Detailed>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let Some(property) = self
            .execute(Select(By::<Option<Property>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        const UNITS_SQL: &str = concat!(
            "SELECT ",
            unit_columns!("u"),
            " FROM units u \
              WHERE u.property_id = $1::UUID \
              ORDER BY u.created_at DESC",
        );
        const EXPENSES_SQL: &str = concat!(
            "SELECT ",
            expense_columns!("e"),
            " FROM expenses e \
              WHERE e.property_id = $1::UUID \
              ORDER BY e.date DESC",
        );
        let units = self
            .query(UNITS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        let expenses = self
            .query(EXPENSES_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(read::property::Detailed {
            property,
            units: units
                .iter()
                .map(|row| unit::from_row(Aliased::new(row, "u")))
                .collect::<Vec<Unit>>(),
            expenses: expenses
                .iter()
                .map(|row| expense::from_row(Aliased::new(row, "e")))
                .collect::<Vec<Expense>>(),
        }))
    }
}
