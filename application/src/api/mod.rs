//! REST API definitions.

pub mod dashboard;
pub mod expense;
mod input;
pub mod payment;
pub mod property;
pub mod tenant;
pub mod unit;

use std::str::FromStr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::Error;

/// Creates a new [`Router`] serving the REST API.
///
/// Handlers expect the [`Service`] to be provided as an [`Extension`].
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
pub fn router() -> Router {
    let api = Router::new()
        .route("/dashboard", get(dashboard::get))
        .route("/properties", get(property::list).post(property::create))
        .route(
            "/properties/:id",
            get(property::get)
                .put(property::update)
                .delete(property::delete),
        )
        .route("/units", get(unit::list).post(unit::create))
        .route(
            "/units/:id",
            get(unit::get).put(unit::update).delete(unit::delete),
        )
        .route("/tenants", get(tenant::list).post(tenant::create))
        .route(
            "/tenants/:id",
            get(tenant::get).put(tenant::update).delete(tenant::delete),
        )
        .route("/payments", get(payment::list).post(payment::create))
        .route("/payments/upcoming", get(payment::upcoming))
        .route(
            "/payments/:id",
            get(payment::get).put(payment::update).delete(payment::delete),
        )
        .route("/expenses", get(expense::list).post(expense::create))
        .route(
            "/expenses/:id",
            get(expense::get).put(expense::update).delete(expense::delete),
        );
    Router::new().nest("/api", api)
}

/// Response of a newly created entity.
#[derive(Clone, Copy, Debug)]
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Response of a successfully deleted entity.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Deleted {
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// Parses the provided `raw` path segment as an ID, considering unparsable
/// IDs as not found ones.
///
/// # Errors
///
/// With the `not_found` [`Error`] if the `raw` ID doesn't parse.
fn id<T: FromStr>(raw: &str, not_found: impl Into<Error>) -> Result<T, Error> {
    raw.parse().map_err(|_| not_found.into())
}
