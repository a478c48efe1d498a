//! [`Tenant`]-related definitions.

use axum::{extract::Path, Extension, Json};
use axum_extra::extract::WithRejection;
use common::{datetime::serde::rfc3339, Date};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, tenant, unit},
    query::{self, Query as _},
    read::{self, Count},
};
use validator::Validate;

use crate::{
    api::{
        payment::Payment,
        unit::{UnitError, WithProperty},
        Created, Deleted,
    },
    define_error, AsError, Error, Service,
};

use super::input;

define_error! {
    enum TenantError {
        #[code = "TENANT_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Tenant not found"]
        NotFound,
    }
}

/// Person renting a unit.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// ID of this [`Tenant`].
    pub id: tenant::Id,

    /// Full name of this [`Tenant`].
    pub name: tenant::Name,

    /// Email address of this [`Tenant`].
    pub email: tenant::Email,

    /// Phone number of this [`Tenant`].
    pub phone: tenant::Phone,

    /// ID of the unit this [`Tenant`] rents.
    pub unit_id: unit::Id,

    /// [`Date`] the lease of this [`Tenant`] starts on.
    pub start_date: Date,

    /// Lease status of this [`Tenant`].
    pub status: tenant::Status,

    /// When this [`Tenant`] was created.
    #[serde(serialize_with = "rfc3339::serialize")]
    pub created_at: tenant::CreationDateTime,
}

impl From<domain::Tenant> for Tenant {
    fn from(tenant: domain::Tenant) -> Self {
        let domain::Tenant {
            id,
            unit_id,
            name,
            email,
            phone,
            start_date,
            status,
            created_at,
        } = tenant;
        Self {
            id,
            name,
            email,
            phone,
            unit_id,
            start_date,
            status,
            created_at,
        }
    }
}

/// [`Tenant`] along with the rented unit and its property.
#[derive(Clone, Debug, Serialize)]
pub struct WithUnit {
    /// The [`Tenant`] itself.
    #[serde(flatten)]
    pub tenant: Tenant,

    /// Unit the [`Tenant`] rents, along with its property.
    pub unit: WithProperty,
}

impl From<read::tenant::WithUnit> for WithUnit {
    fn from(with: read::tenant::WithUnit) -> Self {
        let read::tenant::WithUnit {
            tenant,
            unit,
            property,
        } = with;
        Self {
            tenant: tenant.into(),
            unit: read::unit::WithProperty { unit, property }.into(),
        }
    }
}

/// [`Tenant`] in a list.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    /// Listed [`Tenant`] with the rented unit.
    #[serde(flatten)]
    pub tenant: WithUnit,

    /// Numbers of entities related to the [`Tenant`].
    #[serde(rename = "_count")]
    pub count: SummaryCount,
}

/// Numbers of entities related to a [`Tenant`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SummaryCount {
    /// Number of [`Payment`]s made by the [`Tenant`].
    pub payments: Count,
}

impl From<read::tenant::Summary> for Summary {
    fn from(summary: read::tenant::Summary) -> Self {
        let read::tenant::Summary {
            tenant,
            unit,
            property,
            payments_count,
        } = summary;
        Self {
            tenant: read::tenant::WithUnit {
                tenant,
                unit,
                property,
            }
            .into(),
            count: SummaryCount {
                payments: payments_count,
            },
        }
    }
}

/// [`Tenant`] with the rented unit and the made [`Payment`]s.
#[derive(Clone, Debug, Serialize)]
pub struct Detailed {
    /// The [`Tenant`] itself, with the rented unit.
    #[serde(flatten)]
    pub tenant: WithUnit,

    /// [`Payment`]s made by the [`Tenant`], the latest paid first.
    pub payments: Vec<Payment>,
}

impl From<read::tenant::Detailed> for Detailed {
    fn from(detailed: read::tenant::Detailed) -> Self {
        let read::tenant::Detailed {
            tenant,
            unit,
            property,
            payments,
        } = detailed;
        Self {
            tenant: read::tenant::WithUnit {
                tenant,
                unit,
                property,
            }
            .into(),
            payments: payments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Input for creating or updating a [`Tenant`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Full name of the [`Tenant`].
    #[validate(
        required(message = "Tenant name is required"),
        custom(function = "input::non_blank", message = "Tenant name is required"),
        length(max = 255, message = "Tenant name is too long")
    )]
    pub name: Option<String>,

    /// Email address of the [`Tenant`].
    #[validate(
        required(message = "Invalid email address"),
        custom(function = "input::email", message = "Invalid email address")
    )]
    pub email: Option<String>,

    /// Phone number of the [`Tenant`].
    #[validate(
        required(message = "Phone number is required"),
        custom(
            function = "input::non_blank",
            message = "Phone number is required"
        ),
        length(max = 64, message = "Phone number is too long")
    )]
    pub phone: Option<String>,

    /// ID of the unit the [`Tenant`] rents.
    #[validate(
        required(message = "Unit is required"),
        custom(function = "input::non_blank", message = "Unit is required")
    )]
    pub unit_id: Option<String>,

    /// [`Date`] the lease of the [`Tenant`] starts on.
    #[validate(
        required(message = "Start date is required"),
        custom(function = "input::date", message = "Start date is required")
    )]
    pub start_date: Option<String>,

    /// Lease status of the [`Tenant`].
    #[serde(default)]
    pub status: tenant::Status,
}

/// Fields of a [`Tenant`] parsed from an [`Input`].
struct Fields {
    name: tenant::Name,
    email: tenant::Email,
    phone: tenant::Phone,
    unit_id: unit::Id,
    start_date: Date,
    status: tenant::Status,
}

impl Input {
    /// Checks this [`Input`] and parses it into [`Fields`].
    fn parse(self) -> Result<Fields, Error> {
        self.validate().map_err(AsError::into_error)?;

        let Self {
            name,
            email,
            phone,
            unit_id,
            start_date,
            status,
        } = self;
        Ok(Fields {
            name: input::field("name", name, tenant::Name::new)?,
            email: input::field("email", email, tenant::Email::new)?,
            phone: input::field("phone", phone, tenant::Phone::new)?,
            unit_id: super::id(
                &input::field("unit_id", unit_id, Some)?,
                UnitError::NotFound,
            )?,
            start_date: input::field("start_date", start_date, |d| {
                Date::parse(&d).ok()
            })?,
            status,
        })
    }
}

/// Lists all the [`Tenant`]s, the newest first.
#[tracing::instrument(skip_all)]
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Summary>>, Error> {
    let tenants = service
        .execute(query::tenant::List::by(()))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

/// Returns the [`Tenant`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Detailed>, Error> {
    let id = super::id(&id, TenantError::NotFound)?;
    service
        .execute(query::tenant::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|t| Json(t.into()))
        .ok_or_else(|| TenantError::NotFound.into())
}

/// Creates a new [`Tenant`], occupying the rented unit.
#[tracing::instrument(skip_all)]
pub async fn create(
    Extension(service): Extension<Service>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Created<WithUnit>, Error> {
    let Fields {
        name,
        email,
        phone,
        unit_id,
        start_date,
        status,
    } = input.parse()?;

    let tenant = service
        .execute(command::CreateTenant {
            unit_id,
            name,
            email,
            phone,
            start_date,
            status,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Created(tenant.into()))
}

/// Updates the [`Tenant`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Json<WithUnit>, Error> {
    let tenant_id = super::id(&id, TenantError::NotFound)?;
    let Fields {
        name,
        email,
        phone,
        unit_id,
        start_date,
        status,
    } = input.parse()?;

    let tenant = service
        .execute(command::UpdateTenant {
            tenant_id,
            unit_id,
            name,
            email,
            phone,
            start_date,
            status,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(tenant.into()))
}

/// Deletes the [`Tenant`] with the provided ID, vacating the rented unit if
/// nobody else actively rents it.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, Error> {
    let tenant_id = super::id(&id, TenantError::NotFound)?;
    service
        .execute(command::DeleteTenant { tenant_id })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(Deleted {
        message: "Tenant deleted successfully",
    }))
}

impl AsError for command::create_tenant::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UnitNotExists(_) => Some(UnitError::NotFound.into()),
        }
    }
}

impl AsError for command::update_tenant::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::TenantNotExists(_) => Some(TenantError::NotFound.into()),
            Self::UnitNotExists(_) => Some(UnitError::NotFound.into()),
        }
    }
}

impl AsError for command::delete_tenant::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::TenantNotExists(_) => Some(TenantError::NotFound.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;
    use service::domain::tenant;

    use super::Input;

    fn input(value: serde_json::Value) -> Input {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_valid_input() {
        let fields = input(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "+256 700 000000",
            "unitId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "startDate": "2024-01-15T00:00:00.000Z",
        }))
        .parse()
        .ok()
        .unwrap();

        assert_eq!(fields.status, tenant::Status::Active);
        assert_eq!(fields.start_date.to_long_string(), "January 15, 2024");
    }

    #[test]
    fn rejects_invalid_email() {
        let err = input(json!({
            "name": "Jane Doe",
            "email": "jane@",
            "phone": "+256 700 000000",
            "unitId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "startDate": "2024-01-15",
        }))
        .parse()
        .err()
        .unwrap();

        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, ["email"]);
        assert_eq!(err.issues[0].message, "Invalid email address");
    }
}
