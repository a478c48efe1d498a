//! Dashboard-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::tenant,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::dashboard::Totals,
};

impl<C> Database<Select<By<Totals, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Totals;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Totals, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT (SELECT COUNT(*) FROM properties) AS properties, \
                   (SELECT COUNT(*) FROM units) AS units, \
                   (SELECT COUNT(*) FROM tenants \
                    WHERE status = $1::INT2) AS active_tenants";
        Ok(self
            .query_opt(SQL, &[&tenant::Status::Active])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Totals {
                properties: row.get::<_, i64>("properties").into(),
                units: row.get::<_, i64>("units").into(),
                active_tenants: row.get::<_, i64>("active_tenants").into(),
            })
            .unwrap_or_default())
    }
}
