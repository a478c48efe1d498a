//! [`Property`]-related definitions.

use axum::{extract::Path, Extension, Json};
use axum_extra::extract::WithRejection;
use common::datetime::serde::rfc3339;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, property},
    query::{self, Query as _},
    read::{self, Count},
};
use validator::Validate;

use crate::{
    api::{expense::Expense, unit::Unit, Created, Deleted},
    define_error, AsError, Error, Service,
};

use super::input;

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property not found"]
        NotFound,

        #[code = "CONSTRAINT_VIOLATION"]
        #[status = INTERNAL_SERVER_ERROR]
        #[message = "Failed to delete property"]
        InUse,
    }
}

/// Real estate property.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// ID of this [`Property`].
    pub id: property::Id,

    /// Short code of this [`Property`].
    pub code: property::Code,

    /// Name of this [`Property`].
    pub name: property::Name,

    /// Postal address of this [`Property`].
    pub address: property::Address,

    /// Description of this [`Property`], if any.
    pub description: Option<property::Description>,

    /// When this [`Property`] was created.
    #[serde(serialize_with = "rfc3339::serialize")]
    pub created_at: property::CreationDateTime,
}

impl From<domain::Property> for Property {
    fn from(property: domain::Property) -> Self {
        let domain::Property {
            id,
            code,
            name,
            address,
            description,
            created_at,
        } = property;
        Self {
            id,
            code,
            name,
            address,
            description,
            created_at,
        }
    }
}

/// [`Property`] in a list, with numbers of related entities.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    /// Listed [`Property`].
    #[serde(flatten)]
    pub property: Property,

    /// Numbers of entities related to the [`Property`].
    #[serde(rename = "_count")]
    pub count: SummaryCount,
}

/// Numbers of entities related to a [`Property`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SummaryCount {
    /// Number of [`Unit`]s of the [`Property`].
    pub units: Count,

    /// Number of [`Expense`]s of the [`Property`].
    pub expenses: Count,
}

impl From<read::property::Summary> for Summary {
    fn from(summary: read::property::Summary) -> Self {
        let read::property::Summary {
            property,
            units_count,
            expenses_count,
        } = summary;
        Self {
            property: property.into(),
            count: SummaryCount {
                units: units_count,
                expenses: expenses_count,
            },
        }
    }
}

/// [`Property`] with its [`Unit`]s and [`Expense`]s.
#[derive(Clone, Debug, Serialize)]
pub struct Detailed {
    /// The [`Property`] itself.
    #[serde(flatten)]
    pub property: Property,

    /// [`Unit`]s of the [`Property`].
    pub units: Vec<Unit>,

    /// [`Expense`]s made for the [`Property`].
    pub expenses: Vec<Expense>,
}

impl From<read::property::Detailed> for Detailed {
    fn from(detailed: read::property::Detailed) -> Self {
        let read::property::Detailed {
            property,
            units,
            expenses,
        } = detailed;
        Self {
            property: property.into(),
            units: units.into_iter().map(Into::into).collect(),
            expenses: expenses.into_iter().map(Into::into).collect(),
        }
    }
}

/// Input for creating or updating a [`Property`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Short code of the [`Property`].
    #[validate(
        required(message = "Property code is required"),
        custom(
            function = "input::non_blank",
            message = "Property code is required"
        ),
        length(max = 64, message = "Property code is too long")
    )]
    pub code: Option<String>,

    /// Name of the [`Property`].
    #[validate(
        required(message = "Property name is required"),
        custom(
            function = "input::non_blank",
            message = "Property name is required"
        ),
        length(max = 255, message = "Property name is too long")
    )]
    pub name: Option<String>,

    /// Postal address of the [`Property`].
    #[validate(
        required(message = "Address is required"),
        custom(function = "input::non_blank", message = "Address is required"),
        length(max = 512, message = "Address is too long")
    )]
    pub address: Option<String>,

    /// Description of the [`Property`].
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
}

/// Fields of a [`Property`] parsed from an [`Input`].
struct Fields {
    code: property::Code,
    name: property::Name,
    address: property::Address,
    description: Option<property::Description>,
}

impl Input {
    /// Checks this [`Input`] and parses it into [`Fields`].
    fn parse(self) -> Result<Fields, Error> {
        self.validate().map_err(AsError::into_error)?;

        let Self {
            code,
            name,
            address,
            description,
        } = self;
        Ok(Fields {
            code: input::field("code", code, property::Code::new)?,
            name: input::field("name", name, property::Name::new)?,
            address: input::field("address", address, property::Address::new)?,
            description: input::optional("description", description)?,
        })
    }
}

/// Lists all the [`Property`]s, the newest first.
#[tracing::instrument(skip_all)]
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Summary>>, Error> {
    let properties = service
        .execute(query::property::List::by(()))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(properties.into_iter().map(Into::into).collect()))
}

/// Returns the [`Property`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Detailed>, Error> {
    let id = super::id(&id, PropertyError::NotFound)?;
    service
        .execute(query::property::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|p| Json(p.into()))
        .ok_or_else(|| PropertyError::NotFound.into())
}

/// Creates a new [`Property`].
#[tracing::instrument(skip_all)]
pub async fn create(
    Extension(service): Extension<Service>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Created<Property>, Error> {
    let Fields {
        code,
        name,
        address,
        description,
    } = input.parse()?;

    let property = service
        .execute(command::CreateProperty {
            code,
            name,
            address,
            description,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Created(property.into()))
}

/// Updates the [`Property`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Json<Property>, Error> {
    let property_id = super::id(&id, PropertyError::NotFound)?;
    let Fields {
        code,
        name,
        address,
        description,
    } = input.parse()?;

    let property = service
        .execute(command::UpdateProperty {
            property_id,
            code,
            name,
            address,
            description,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(property.into()))
}

/// Deletes the [`Property`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, Error> {
    let property_id = super::id(&id, PropertyError::NotFound)?;
    service
        .execute(command::DeleteProperty { property_id })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(Deleted {
        message: "Property deleted successfully",
    }))
}

impl AsError for command::update_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(PropertyError::NotFound.into()),
        }
    }
}

impl AsError for command::delete_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyInUse(_) => Some(PropertyError::InUse.into()),
            Self::PropertyNotExists(_) => Some(PropertyError::NotFound.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use super::Input;

    fn input(value: serde_json::Value) -> Input {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn lists_every_failing_field() {
        let err = input(json!({"code": "", "address": "  "}))
            .parse()
            .err()
            .unwrap();

        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        let paths = err
            .issues
            .iter()
            .map(|i| (i.path.join("."), i.message.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            paths,
            [
                ("address".to_owned(), "Address is required".to_owned()),
                ("code".to_owned(), "Property code is required".to_owned()),
                ("name".to_owned(), "Property name is required".to_owned()),
            ],
        );
    }

    #[test]
    fn treats_blank_description_as_absent() {
        let fields = input(json!({
            "code": "SV",
            "name": "Sunset Villas",
            "address": "12 Kampala Rd",
            "description": "",
        }))
        .parse()
        .ok()
        .unwrap();

        assert_eq!(fields.code.to_string(), "SV");
        assert!(fields.description.is_none());
    }
}
