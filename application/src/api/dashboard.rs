//! Dashboard definitions.

use axum::{Extension, Json};
use serde::Serialize;
use service::{
    query::{self, Query as _},
    read::{self, Count},
};

use crate::{api::payment, AsError, Error, Service};

/// Overview of the whole managed portfolio.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Number of all the properties.
    pub properties: Count,

    /// Number of all the units.
    pub units: Count,

    /// Number of the active tenants.
    pub active_tenants: Count,

    /// The most recently made payments.
    pub recent_payments: Vec<payment::Detailed>,
}

impl From<read::dashboard::Dashboard> for Dashboard {
    fn from(dashboard: read::dashboard::Dashboard) -> Self {
        let read::dashboard::Dashboard {
            totals:
                read::dashboard::Totals {
                    properties,
                    units,
                    active_tenants,
                },
            recent_payments,
        } = dashboard;
        Self {
            properties,
            units,
            active_tenants,
            recent_payments: recent_payments
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Returns the [`Dashboard`] of the portfolio.
#[tracing::instrument(skip_all)]
pub async fn get(
    Extension(service): Extension<Service>,
) -> Result<Json<Dashboard>, Error> {
    let dashboard = service
        .execute(query::Dashboard)
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(dashboard.into()))
}
