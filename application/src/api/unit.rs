//! [`Unit`]-related definitions.

use axum::{extract::Path, Extension, Json};
use axum_extra::extract::WithRejection;
use common::{datetime::serde::rfc3339, Amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, property, unit},
    query::{self, Query as _},
    read::{self, Count},
};
use validator::Validate;

use crate::{
    api::{
        payment::Payment,
        property::{Property, PropertyError},
        tenant::Tenant,
        Created, Deleted,
    },
    define_error, AsError, Error, Service,
};

use super::input;

define_error! {
    enum UnitError {
        #[code = "UNIT_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Unit not found"]
        NotFound,

        #[code = "CONSTRAINT_VIOLATION"]
        #[status = INTERNAL_SERVER_ERROR]
        #[message = "Failed to delete unit"]
        InUse,
    }
}

/// Rentable unit of a [`Property`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// ID of this [`Unit`].
    pub id: unit::Id,

    /// Short code of this [`Unit`].
    pub code: unit::Code,

    /// Name of this [`Unit`].
    pub name: unit::Name,

    /// ID of the [`Property`] this [`Unit`] belongs to.
    pub property_id: property::Id,

    /// Monthly rent of this [`Unit`].
    pub rent_amount: Amount,

    /// Occupancy status of this [`Unit`].
    pub status: unit::Status,

    /// When this [`Unit`] was created.
    #[serde(serialize_with = "rfc3339::serialize")]
    pub created_at: unit::CreationDateTime,
}

impl From<domain::Unit> for Unit {
    fn from(unit: domain::Unit) -> Self {
        let domain::Unit {
            id,
            property_id,
            code,
            name,
            rent_amount,
            status,
            created_at,
        } = unit;
        Self {
            id,
            code,
            name,
            property_id,
            rent_amount,
            status,
            created_at,
        }
    }
}

/// [`Unit`] along with its [`Property`].
#[derive(Clone, Debug, Serialize)]
pub struct WithProperty {
    /// The [`Unit`] itself.
    #[serde(flatten)]
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,
}

impl From<read::unit::WithProperty> for WithProperty {
    fn from(with: read::unit::WithProperty) -> Self {
        let read::unit::WithProperty { unit, property } = with;
        Self {
            unit: unit.into(),
            property: property.into(),
        }
    }
}

/// [`Unit`] in a list.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    /// Listed [`Unit`].
    #[serde(flatten)]
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,

    /// Active [`Tenant`]s of the [`Unit`].
    pub tenants: Vec<Tenant>,

    /// Numbers of entities related to the [`Unit`].
    #[serde(rename = "_count")]
    pub count: SummaryCount,
}

/// Numbers of entities related to a [`Unit`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SummaryCount {
    /// Number of all the [`Tenant`]s of the [`Unit`].
    pub tenants: Count,

    /// Number of [`Payment`]s made for the [`Unit`].
    pub payments: Count,
}

impl From<read::unit::Summary> for Summary {
    fn from(summary: read::unit::Summary) -> Self {
        let read::unit::Summary {
            unit,
            property,
            active_tenants,
            tenants_count,
            payments_count,
        } = summary;
        Self {
            unit: unit.into(),
            property: property.into(),
            tenants: active_tenants.into_iter().map(Into::into).collect(),
            count: SummaryCount {
                tenants: tenants_count,
                payments: payments_count,
            },
        }
    }
}

/// [`Unit`] with its [`Property`], [`Tenant`]s and [`Payment`]s.
#[derive(Clone, Debug, Serialize)]
pub struct Detailed {
    /// The [`Unit`] itself.
    #[serde(flatten)]
    pub unit: Unit,

    /// [`Property`] the [`Unit`] belongs to.
    pub property: Property,

    /// All the [`Tenant`]s of the [`Unit`].
    pub tenants: Vec<Tenant>,

    /// [`Payment`]s made for the [`Unit`].
    pub payments: Vec<Payment>,
}

impl From<read::unit::Detailed> for Detailed {
    fn from(detailed: read::unit::Detailed) -> Self {
        let read::unit::Detailed {
            unit,
            property,
            tenants,
            payments,
        } = detailed;
        Self {
            unit: unit.into(),
            property: property.into(),
            tenants: tenants.into_iter().map(Into::into).collect(),
            payments: payments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Input for creating or updating a [`Unit`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Short code of the [`Unit`].
    #[validate(
        required(message = "Unit code is required"),
        custom(function = "input::non_blank", message = "Unit code is required"),
        length(max = 64, message = "Unit code is too long")
    )]
    pub code: Option<String>,

    /// Name of the [`Unit`].
    #[validate(
        required(message = "Unit name is required"),
        custom(function = "input::non_blank", message = "Unit name is required"),
        length(max = 255, message = "Unit name is too long")
    )]
    pub name: Option<String>,

    /// ID of the [`Property`] the [`Unit`] belongs to.
    #[validate(
        required(message = "Property is required"),
        custom(function = "input::non_blank", message = "Property is required")
    )]
    pub property_id: Option<String>,

    /// Monthly rent of the [`Unit`].
    #[validate(
        required(message = "Rent amount is required"),
        custom(
            function = "input::positive",
            message = "Rent amount must be positive"
        )
    )]
    pub rent_amount: Option<Decimal>,

    /// Occupancy status of the [`Unit`].
    #[serde(default)]
    pub status: unit::Status,
}

/// Fields of a [`Unit`] parsed from an [`Input`].
struct Fields {
    code: unit::Code,
    name: unit::Name,
    property_id: property::Id,
    rent_amount: Amount,
    status: unit::Status,
}

impl Input {
    /// Checks this [`Input`] and parses it into [`Fields`].
    fn parse(self) -> Result<Fields, Error> {
        self.validate().map_err(AsError::into_error)?;

        let Self {
            code,
            name,
            property_id,
            rent_amount,
            status,
        } = self;
        Ok(Fields {
            code: input::field("code", code, unit::Code::new)?,
            name: input::field("name", name, unit::Name::new)?,
            property_id: super::id(
                &input::field("property_id", property_id, Some)?,
                PropertyError::NotFound,
            )?,
            rent_amount: input::field("rent_amount", rent_amount, Amount::new)?,
            status,
        })
    }
}

/// Lists all the [`Unit`]s, the newest first.
#[tracing::instrument(skip_all)]
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Summary>>, Error> {
    let units = service
        .execute(query::unit::List::by(()))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(units.into_iter().map(Into::into).collect()))
}

/// Returns the [`Unit`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Detailed>, Error> {
    let id = super::id(&id, UnitError::NotFound)?;
    service
        .execute(query::unit::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|u| Json(u.into()))
        .ok_or_else(|| UnitError::NotFound.into())
}

/// Creates a new [`Unit`].
#[tracing::instrument(skip_all)]
pub async fn create(
    Extension(service): Extension<Service>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Created<WithProperty>, Error> {
    let Fields {
        code,
        name,
        property_id,
        rent_amount,
        status,
    } = input.parse()?;

    let unit = service
        .execute(command::CreateUnit {
            property_id,
            code,
            name,
            rent_amount,
            status,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Created(unit.into()))
}

/// Updates the [`Unit`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Json<WithProperty>, Error> {
    let unit_id = super::id(&id, UnitError::NotFound)?;
    let Fields {
        code,
        name,
        property_id,
        rent_amount,
        status,
    } = input.parse()?;

    let unit = service
        .execute(command::UpdateUnit {
            unit_id,
            property_id,
            code,
            name,
            rent_amount,
            status,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(unit.into()))
}

/// Deletes the [`Unit`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, Error> {
    let unit_id = super::id(&id, UnitError::NotFound)?;
    service
        .execute(command::DeleteUnit { unit_id })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(Deleted {
        message: "Unit deleted successfully",
    }))
}

impl AsError for command::create_unit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(PropertyError::NotFound.into()),
        }
    }
}

impl AsError for command::update_unit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(PropertyError::NotFound.into()),
            Self::UnitNotExists(_) => Some(UnitError::NotFound.into()),
        }
    }
}

impl AsError for command::delete_unit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UnitInUse(_) => Some(UnitError::InUse.into()),
            Self::UnitNotExists(_) => Some(UnitError::NotFound.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;
    use service::domain::unit;

    use super::Input;

    fn input(value: serde_json::Value) -> Input {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn defaults_to_vacant() {
        let fields = input(json!({
            "code": "A-1",
            "name": "Apartment 1",
            "propertyId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "rentAmount": 1200,
        }))
        .parse()
        .ok()
        .unwrap();

        assert_eq!(fields.status, unit::Status::Vacant);
        assert_eq!(fields.rent_amount.to_string(), "1200");
    }

    #[test]
    fn rejects_non_positive_rent() {
        let err = input(json!({
            "code": "A-1",
            "name": "Apartment 1",
            "propertyId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "rentAmount": 0,
        }))
        .parse()
        .err()
        .unwrap();

        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, ["rentAmount"]);
        assert_eq!(err.issues[0].message, "Rent amount must be positive");
    }

    #[test]
    fn unknown_property_id_is_not_found() {
        let err = input(json!({
            "code": "A-1",
            "name": "Apartment 1",
            "propertyId": "nope",
            "rentAmount": 1200,
        }))
        .parse()
        .err()
        .unwrap();

        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }
}
