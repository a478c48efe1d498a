//! [`Payment`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{payment, Payment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::{property, tenant, unit, Aliased};

/// Reads a [`Payment`] from the provided [`Aliased`] row.
pub(super) fn from_row(row: Aliased<'_>) -> Payment {
    Payment {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        unit_id: row.get("unit_id"),
        amount: row.get("amount"),
        payment_date: row.get("payment_date"),
        months_covered: row.get("months_covered"),
        period: payment::Period {
            start: row.get("period_start"),
            end: row.get("period_end"),
        },
        method: row.get("method"),
        reference: row.get("reference"),
        notes: row.get("notes"),
        status: row.get("status"),
        receipt_sent: row.get("receipt_sent"),
        created_at: row.get("created_at"),
    }
}

/// Reads a [`read::payment::Detailed`] from the provided row, selecting
/// `payments` as `py`, `tenants` as `t`, `units` as `u` and `properties` as
/// `p`.
fn detailed_from_row(row: &tokio_postgres::Row) -> read::payment::Detailed {
    read::payment::Detailed {
        payment: from_row(Aliased::new(row, "py")),
        tenant: tenant::from_row(Aliased::new(row, "t")),
        unit: unit::from_row(Aliased::new(row, "u")),
        property: property::from_row(Aliased::new(row, "p")),
    }
}

impl<C> Database<Select<By<Option<Payment>, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            payment_columns!("py"),
            " FROM payments py \
              WHERE py.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(Aliased::new(&row, "py"))))
    }
}

impl<C> Database<Select<By<Option<Payment>, read::payment::LatestOf>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, read::payment::LatestOf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::payment::LatestOf { tenant_id, except } = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            payment_columns!("py"),
            " FROM payments py \
              WHERE py.tenant_id = $1::UUID \
                AND ($2::UUID IS NULL OR py.id <> $2::UUID) \
              ORDER BY py.period_end DESC \
              LIMIT 1",
        );
        Ok(self
            .query_opt(SQL, &[&tenant_id, &except])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(Aliased::new(&row, "py"))))
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Payment>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(payment))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(payment): Update<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            tenant_id,
            unit_id,
            amount,
            payment_date,
            months_covered,
            period,
            method,
            reference,
            notes,
            status,
            receipt_sent,
            created_at,
        } = payment;

        const SQL: &str = "\
            INSERT INTO payments (\
                id, tenant_id, unit_id, amount, payment_date, \
                months_covered, period_start, period_end, \
                method, reference, notes, status, receipt_sent, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::NUMERIC, $5::DATE, \
                $6::INT4, $7::DATE, $8::DATE, \
                $9::VARCHAR, $10::VARCHAR, $11::VARCHAR, $12::INT2, \
                $13::BOOL, $14::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET tenant_id = EXCLUDED.tenant_id, \
                unit_id = EXCLUDED.unit_id, \
                amount = EXCLUDED.amount, \
                payment_date = EXCLUDED.payment_date, \
                months_covered = EXCLUDED.months_covered, \
                period_start = EXCLUDED.period_start, \
                period_end = EXCLUDED.period_end, \
                method = EXCLUDED.method, \
                reference = EXCLUDED.reference, \
                notes = EXCLUDED.notes, \
                status = EXCLUDED.status, \
                receipt_sent = EXCLUDED.receipt_sent";
        self.exec(
            SQL,
            &[
                &id,
                &tenant_id,
                &unit_id,
                &amount,
                &payment_date,
                &months_covered,
                &period.start,
                &period.end,
                &method,
                &reference,
                &notes,
                &status,
                &receipt_sent,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Payment, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Payment, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM payments \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<read::payment::Detailed>, payment::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::payment::Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::payment::Detailed>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            payment_columns!("py"),
            ", ",
            tenant_columns!("t"),
            ", ",
            unit_columns!("u"),
            ", ",
            property_columns!("p"),
            " FROM payments py \
              JOIN tenants t ON t.id = py.tenant_id \
              JOIN units u ON u.id = py.unit_id \
              JOIN properties p ON p.id = u.property_id \
              WHERE py.id = $1::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(detailed_from_row))
    }
}

impl<C>
    Database<
        Select<By<Vec<read::payment::Detailed>, read::payment::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::payment::Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::payment::Detailed>, read::payment::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::payment::list::Filter {
            status,
            tenant_id,
            limit,
        } = by.into_inner();

        // `LIMIT NULL` means no limit at all.
        let limit = limit.map(i64::from);

        const SQL: &str = concat!(
            "SELECT ",
            payment_columns!("py"),
            ", ",
            tenant_columns!("t"),
            ", ",
            unit_columns!("u"),
            ", ",
            property_columns!("p"),
            " FROM payments py \
              JOIN tenants t ON t.id = py.tenant_id \
              JOIN units u ON u.id = py.unit_id \
              JOIN properties p ON p.id = u.property_id \
              WHERE ($1::INT2 IS NULL OR py.status = $1::INT2) \
                AND ($2::UUID IS NULL OR py.tenant_id = $2::UUID) \
              ORDER BY py.payment_date DESC, py.created_at DESC \
              LIMIT $3::INT8",
        );
        Ok(self
            .query(SQL, &[&status, &tenant_id, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(detailed_from_row)
            .collect())
    }
}
