//! [`Database`] implementations.

#![allow(
    clippy::items_after_statements,
    reason = "`const SQL` after statements"
)]
#![allow(clippy::too_many_lines, reason = "SQL-related code a bit verbose")]

/// Lists the provided columns of a table aliased as `$alias`, naming each of
/// them `{$alias}_{column}`.
macro_rules! columns {
    ($alias:literal: $first:literal $(, $column:literal)* $(,)?) => {
        concat!(
            $alias, ".", $first, " AS ", $alias, "_", $first
            $(, ", ", $alias, ".", $column, " AS ", $alias, "_", $column)*
        )
    };
}

/// Lists the columns of the `properties` table aliased as `$alias`.
macro_rules! property_columns {
    ($alias:literal) => {
        columns!($alias:
            "id", "code", "name", "address", "description", "created_at")
    };
}

/// Lists the columns of the `units` table aliased as `$alias`.
macro_rules! unit_columns {
    ($alias:literal) => {
        columns!($alias:
            "id", "property_id", "code", "name", "rent_amount", "status",
            "created_at")
    };
}

/// Lists the columns of the `tenants` table aliased as `$alias`.
macro_rules! tenant_columns {
    ($alias:literal) => {
        columns!($alias:
            "id", "unit_id", "name", "email", "phone", "start_date", "status",
            "created_at")
    };
}

/// Lists the columns of the `payments` table aliased as `$alias`.
macro_rules! payment_columns {
    ($alias:literal) => {
        columns!($alias:
            "id", "tenant_id", "unit_id", "amount", "payment_date",
            "months_covered", "period_start", "period_end", "method",
            "reference", "notes", "status", "receipt_sent", "created_at")
    };
}

/// Lists the columns of the `expenses` table aliased as `$alias`.
macro_rules! expense_columns {
    ($alias:literal) => {
        columns!($alias:
            "id", "property_id", "description", "amount", "category", "date",
            "notes", "created_at")
    };
}

mod dashboard;
mod expense;
mod payment;
mod property;
mod tenant;
mod unit;

use async_trait::async_trait;
use postgres_types::FromSql;
use refinery_core::{
    traits::r#async::{AsyncQuery, AsyncTransaction},
    AsyncMigrate, Migration,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::infra::{database, postgres};
#[cfg(doc)]
use crate::infra::Database;

use super::Postgres;

/// [`Row`] of joined tables, whose columns are listed via [`columns!`] macro.
#[derive(Clone, Copy)]
struct Aliased<'r> {
    /// Underlying [`Row`].
    row: &'r Row,

    /// Alias of the table to read the columns of.
    alias: &'static str,
}

impl<'r> Aliased<'r> {
    /// Wraps the provided [`Row`] to read the columns of the table `alias`ed
    /// as provided.
    fn new(row: &'r Row, alias: &'static str) -> Self {
        Self { row, alias }
    }

    /// Returns the value of the provided `column` of the aliased table.
    ///
    /// # Panics
    ///
    /// If the `column` is not selected or has an unexpected type.
    fn get<T: FromSql<'r>>(self, column: &str) -> T {
        self.row.get(format!("{}_{column}", self.alias).as_str())
    }
}

#[async_trait]
impl AsyncTransaction for Postgres {
    type Error = Traced<database::Error>;

    async fn execute(
        &mut self,
        queries: &[&str],
    ) -> Result<usize, Self::Error> {
        let mut conn = self.0.checkout().await?;
        AsyncTransaction::execute(&mut **conn, queries)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

#[async_trait]
impl AsyncQuery<Vec<Migration>> for Postgres {
    async fn query(
        &mut self,
        query: &str,
    ) -> Result<Vec<Migration>, <Self as AsyncTransaction>::Error> {
        let mut conn = self.0.checkout().await?;
        AsyncQuery::query(&mut **conn, query)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl AsyncMigrate for Postgres {}
