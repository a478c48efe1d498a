//! [`Dashboard`] [`Query`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    read::{self, dashboard::Totals},
    Service,
};
#[cfg(doc)]
use crate::domain::Payment;

use super::Query;

/// [`Query`] for an overview of the whole managed portfolio.
#[derive(Clone, Copy, Debug)]
pub struct Dashboard;

impl Dashboard {
    /// Number of the most recent [`Payment`]s to overview.
    pub const RECENT_PAYMENTS: u16 = 5;
}

impl<Db, M> Query<Dashboard> for Service<Db, M>
where
    Db: Database<
            Select<By<Totals, ()>>,
            Ok = Totals,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<Vec<read::payment::Detailed>, read::payment::list::Filter>,
            >,
            Ok = Vec<read::payment::Detailed>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = read::dashboard::Dashboard;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Dashboard) -> Result<Self::Ok, Self::Err> {
        let recent = read::payment::list::Filter {
            limit: Some(Dashboard::RECENT_PAYMENTS),
            ..read::payment::list::Filter::default()
        };
        let (totals, recent_payments) = futures::try_join!(
            self.database().execute(Select(By::<Totals, _>::new(()))),
            self.database().execute(Select(By::<
                Vec<read::payment::Detailed>,
                _,
            >::new(recent))),
        )
        .map_err(tracerr::wrap!())?;

        Ok(read::dashboard::Dashboard {
            totals,
            recent_payments,
        })
    }
}
