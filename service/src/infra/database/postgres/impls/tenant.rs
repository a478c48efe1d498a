//! [`Tenant`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{payment as payments, tenant, unit, Tenant},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::{payment, property, unit as units, Aliased};

/// Reads a [`Tenant`] from the provided [`Aliased`] row.
pub(super) fn from_row(row: Aliased<'_>) -> Tenant {
    Tenant {
        id: row.get("id"),
        unit_id: row.get("unit_id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        start_date: row.get("start_date"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Tenant>, tenant::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Tenant>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Tenant>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: tenant::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            tenant_columns!("t"),
            " FROM tenants t \
              WHERE t.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(Aliased::new(&row, "t"))))
    }
}

impl<C> Database<Insert<Tenant>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Tenant>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(tenant): Insert<Tenant>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(tenant)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Tenant>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(tenant): Update<Tenant>,
    ) -> Result<Self::Ok, Self::Err> {
        let Tenant {
            id,
            unit_id,
            name,
            email,
            phone,
            start_date,
            status,
            created_at,
        } = tenant;

        const SQL: &str = "\
            INSERT INTO tenants (\
                id, unit_id, name, email, phone, start_date, status, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::DATE, $7::INT2, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET unit_id = EXCLUDED.unit_id, \
                name = EXCLUDED.name, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                start_date = EXCLUDED.start_date, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &unit_id,
                &name,
                &email,
                &phone,
                &start_date,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Tenant, tenant::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Tenant, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: tenant::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM tenants \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<read::tenant::WithUnit>, tenant::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::tenant::WithUnit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::tenant::WithUnit>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: tenant::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            tenant_columns!("t"),
            ", ",
            unit_columns!("u"),
            ", ",
            property_columns!("p"),
            " FROM tenants t \
              JOIN units u ON u.id = t.unit_id \
              JOIN properties p ON p.id = u.property_id \
              WHERE t.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| read::tenant::WithUnit {
                tenant: from_row(Aliased::new(&row, "t")),
                unit: units::from_row(Aliased::new(&row, "u")),
                property: property::from_row(Aliased::new(&row, "p")),
            }))
    }
}

impl<C> Database<Select<By<Vec<read::tenant::Summary>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::tenant::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<read::tenant::Summary>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = concat!(
            "SELECT ",
            tenant_columns!("t"),
            ", ",
            unit_columns!("u"),
            ", ",
            property_columns!("p"),
            ", (SELECT COUNT(*) FROM payments py \
                WHERE py.tenant_id = t.id) AS payments_count \
             FROM tenants t \
             JOIN units u ON u.id = t.unit_id \
             JOIN properties p ON p.id = u.property_id \
             ORDER BY t.created_at DESC",
        );
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::tenant::Summary {
                tenant: from_row(Aliased::new(row, "t")),
                unit: units::from_row(Aliased::new(row, "u")),
                property: property::from_row(Aliased::new(row, "p")),
                payments_count: row.get::<_, i64>("payments_count").into(),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<read::tenant::Detailed>, tenant::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<read::tenant::WithUnit>, tenant::Id>>,
        Ok = Option<read::tenant::WithUnit>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<read::tenant::Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::tenant::Detailed>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let Some(read::tenant::WithUnit {
            tenant,
            unit,
            property,
        }) = self
            .execute(Select(By::<Option<read::tenant::WithUnit>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        const SQL: &str = concat!(
            "SELECT ",
            payment_columns!("py"),
            " FROM payments py \
              WHERE py.tenant_id = $1::UUID \
              ORDER BY py.payment_date DESC",
        );
        let payments = self
            .query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| payment::from_row(Aliased::new(row, "py")))
            .collect();

        Ok(Some(read::tenant::Detailed {
            tenant,
            unit,
            property,
            payments,
        }))
    }
}

impl<C> Database<Select<By<read::tenant::ActiveCount, unit::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::tenant::ActiveCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::tenant::ActiveCount, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let unit_id: unit::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*) AS count \
            FROM tenants \
            WHERE unit_id = $1::UUID \
              AND status = $2::INT2";
        let row = self
            .query_opt(SQL, &[&unit_id, &tenant::Status::Active])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(read::tenant::ActiveCount(
            row.map_or(0, |r| r.get::<_, i64>("count")).into(),
        ))
    }
}

impl<C>
    Database<Select<By<Vec<read::tenant::WithLatestPayment>, tenant::Status>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::tenant::WithLatestPayment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::tenant::WithLatestPayment>, tenant::Status>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let status: tenant::Status = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            tenant_columns!("t"),
            ", ",
            unit_columns!("u"),
            ", ",
            property_columns!("p"),
            ", ",
            payment_columns!("py"),
            " FROM tenants t \
              JOIN units u ON u.id = t.unit_id \
              JOIN properties p ON p.id = u.property_id \
              LEFT JOIN LATERAL (\
                  SELECT * \
                  FROM payments \
                  WHERE tenant_id = t.id \
                  ORDER BY period_end DESC \
                  LIMIT 1\
              ) py ON true \
              WHERE t.status = $1::INT2",
        );
        Ok(self
            .query(SQL, &[&status])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::tenant::WithLatestPayment {
                tenant: from_row(Aliased::new(row, "t")),
                unit: units::from_row(Aliased::new(row, "u")),
                property: property::from_row(Aliased::new(row, "p")),
                // No `Payment` was joined if its ID is `NULL`.
                latest_payment: Aliased::new(row, "py")
                    .get::<Option<payments::Id>>("id")
                    .map(|_| payment::from_row(Aliased::new(row, "py"))),
            })
            .collect())
    }
}
