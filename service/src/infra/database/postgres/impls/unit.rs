//! [`Unit`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{tenant, unit, Unit},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::{payment, property, tenant as tenants, Aliased};

/// Reads a [`Unit`] from the provided [`Aliased`] row.
pub(super) fn from_row(row: Aliased<'_>) -> Unit {
    Unit {
        id: row.get("id"),
        property_id: row.get("property_id"),
        code: row.get("code"),
        name: row.get("name"),
        rent_amount: row.get("rent_amount"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Unit>, unit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Unit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Unit>, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: unit::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            unit_columns!("u"),
            " FROM units u \
              WHERE u.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(Aliased::new(&row, "u"))))
    }
}

impl<C> Database<Insert<Unit>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Unit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(unit): Insert<Unit>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(unit)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Unit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(unit): Update<Unit>,
    ) -> Result<Self::Ok, Self::Err> {
        let Unit {
            id,
            property_id,
            code,
            name,
            rent_amount,
            status,
            created_at,
        } = unit;

        const SQL: &str = "\
            INSERT INTO units (\
                id, property_id, code, name, rent_amount, status, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, \
                $5::NUMERIC, $6::INT2, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET property_id = EXCLUDED.property_id, \
                code = EXCLUDED.code, \
                name = EXCLUDED.name, \
                rent_amount = EXCLUDED.rent_amount, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &code,
                &name,
                &rent_amount,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Unit, unit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Unit, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: unit::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM units \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<read::unit::WithProperty>, unit::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::unit::WithProperty>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::unit::WithProperty>, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: unit::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            unit_columns!("u"),
            ", ",
            property_columns!("p"),
            " FROM units u \
              JOIN properties p ON p.id = u.property_id \
              WHERE u.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| read::unit::WithProperty {
                unit: from_row(Aliased::new(&row, "u")),
                property: property::from_row(Aliased::new(&row, "p")),
            }))
    }
}

impl<C> Database<Select<By<Vec<read::unit::Summary>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::unit::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<read::unit::Summary>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const UNITS_SQL: &str = concat!(
            "SELECT ",
            unit_columns!("u"),
            ", ",
            property_columns!("p"),
            ", (SELECT COUNT(*) FROM tenants t \
                WHERE t.unit_id = u.id) AS tenants_count, \
               (SELECT COUNT(*) FROM payments py \
                WHERE py.unit_id = u.id) AS payments_count \
             FROM units u \
             JOIN properties p ON p.id = u.property_id \
             ORDER BY u.created_at DESC",
        );
        let units = self
            .query(UNITS_SQL, &[])
            .await
            .map_err(tracerr::wrap!())?;

        const TENANTS_SQL: &str = concat!(
            "SELECT ",
            tenant_columns!("t"),
            " FROM tenants t \
              WHERE t.status = $1::INT2 \
              ORDER BY t.created_at DESC",
        );
        let mut active_tenants = self
            .query(TENANTS_SQL, &[&tenant::Status::Active])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| tenants::from_row(Aliased::new(row, "t")))
            .into_group_map_by(|t| t.unit_id);

        Ok(units
            .iter()
            .map(|row| {
                let unit = from_row(Aliased::new(row, "u"));
                read::unit::Summary {
                    active_tenants: active_tenants
                        .remove(&unit.id)
                        .unwrap_or_default(),
                    property: property::from_row(Aliased::new(row, "p")),
                    tenants_count: row.get::<_, i64>("tenants_count").into(),
                    payments_count: row.get::<_, i64>("payments_count").into(),
                    unit,
                }
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<read::unit::Detailed>, unit::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<read::unit::WithProperty>, unit::Id>>,
        Ok = Option<read::unit::WithProperty>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<read::unit::Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::unit::Detailed>, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let Some(read::unit::WithProperty { unit, property }) = self
            .execute(Select(By::<Option<read::unit::WithProperty>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        const TENANTS_SQL: &str = concat!(
            "SELECT ",
            tenant_columns!("t"),
            " FROM tenants t \
              WHERE t.unit_id = $1::UUID \
              ORDER BY t.created_at DESC",
        );
        let tenants = self
            .query(TENANTS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| tenants::from_row(Aliased::new(row, "t")))
            .collect();

        const PAYMENTS_SQL: &str = concat!(
            "SELECT ",
            payment_columns!("py"),
            " FROM payments py \
              WHERE py.unit_id = $1::UUID \
              ORDER BY py.payment_date DESC",
        );
        let payments = self
            .query(PAYMENTS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| payment::from_row(Aliased::new(row, "py")))
            .collect();

        Ok(Some(read::unit::Detailed {
            unit,
            property,
            tenants,
            payments,
        }))
    }
}
