//! [`Expense`]-related definitions.

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use common::{datetime::serde::rfc3339, Amount, Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, expense, property},
    query::{self, Query as _},
    read,
};
use validator::Validate;

use crate::{
    api::{
        property::{Property, PropertyError},
        Created, Deleted,
    },
    define_error, AsError, Error, Service,
};

use super::input;

define_error! {
    enum ExpenseError {
        #[code = "EXPENSE_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Expense not found"]
        NotFound,
    }
}

/// Money spent on a [`Property`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// ID of this [`Expense`].
    pub id: expense::Id,

    /// ID of the [`Property`] this [`Expense`] is made for.
    pub property_id: property::Id,

    /// What this [`Expense`] was made for.
    pub description: expense::Description,

    /// Spent amount.
    pub amount: Amount,

    /// Category of this [`Expense`].
    pub category: expense::Category,

    /// [`Date`] this [`Expense`] was made on.
    pub date: Date,

    /// Additional notes about this [`Expense`].
    pub notes: Option<expense::Notes>,

    /// When this [`Expense`] was created.
    #[serde(serialize_with = "rfc3339::serialize")]
    pub created_at: expense::CreationDateTime,
}

impl From<domain::Expense> for Expense {
    fn from(expense: domain::Expense) -> Self {
        let domain::Expense {
            id,
            property_id,
            description,
            amount,
            category,
            date,
            notes,
            created_at,
        } = expense;
        Self {
            id,
            property_id,
            description,
            amount,
            category,
            date,
            notes,
            created_at,
        }
    }
}

/// [`Expense`] along with its [`Property`].
#[derive(Clone, Debug, Serialize)]
pub struct Detailed {
    /// The [`Expense`] itself.
    #[serde(flatten)]
    pub expense: Expense,

    /// [`Property`] the [`Expense`] is made for.
    pub property: Property,
}

impl From<read::expense::Detailed> for Detailed {
    fn from(detailed: read::expense::Detailed) -> Self {
        let read::expense::Detailed { expense, property } = detailed;
        Self {
            expense: expense.into(),
            property: property.into(),
        }
    }
}

/// Input for creating or updating an [`Expense`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// ID of the [`Property`] the [`Expense`] is made for.
    #[validate(
        required(message = "Property is required"),
        custom(function = "input::non_blank", message = "Property is required")
    )]
    pub property_id: Option<String>,

    /// What the [`Expense`] was made for.
    #[validate(
        required(message = "Description is required"),
        custom(
            function = "input::non_blank",
            message = "Description is required"
        ),
        length(max = 512, message = "Description is too long")
    )]
    pub description: Option<String>,

    /// Spent amount.
    #[validate(
        required(message = "Amount is required"),
        custom(function = "input::positive", message = "Amount must be positive")
    )]
    pub amount: Option<Decimal>,

    /// Category of the [`Expense`].
    #[validate(
        required(message = "Category is required"),
        custom(function = "input::non_blank", message = "Category is required"),
        length(max = 64, message = "Category is too long")
    )]
    pub category: Option<String>,

    /// [`Date`] the [`Expense`] was made on.
    #[validate(
        required(message = "Date is required"),
        custom(function = "input::date", message = "Date is required")
    )]
    pub date: Option<String>,

    /// Additional notes about the [`Expense`].
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Fields of an [`Expense`] parsed from an [`Input`].
struct Fields {
    property_id: property::Id,
    description: expense::Description,
    amount: Amount,
    category: expense::Category,
    date: Date,
    notes: Option<expense::Notes>,
}

impl Input {
    /// Checks this [`Input`] and parses it into [`Fields`].
    fn parse(self) -> Result<Fields, Error> {
        self.validate().map_err(AsError::into_error)?;

        let Self {
            property_id,
            description,
            amount,
            category,
            date,
            notes,
        } = self;
        Ok(Fields {
            property_id: super::id(
                &input::field("property_id", property_id, Some)?,
                PropertyError::NotFound,
            )?,
            description: input::field(
                "description",
                description,
                expense::Description::new,
            )?,
            amount: input::field("amount", amount, Amount::new)?,
            category: input::field("category", category, expense::Category::new)?,
            date: input::field("date", date, |d| Date::parse(&d).ok())?,
            notes: input::optional("notes", notes)?,
        })
    }
}

/// Query parameters of an [`Expense`]s list.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// ID of the [`Property`] to list the [`Expense`]s of.
    pub property_id: Option<String>,
}

/// Lists the [`Expense`]s matching the provided [`ListParams`], the most
/// recent first.
///
/// Nothing is listed for an unparsable [`Property`] ID.
#[tracing::instrument(skip_all)]
pub async fn list(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, Error>,
) -> Result<Json<Vec<Detailed>>, Error> {
    let Ok(property_id) = params
        .property_id
        .map(|id| id.parse::<property::Id>())
        .transpose()
    else {
        return Ok(Json(Vec::new()));
    };
    let expenses = service
        .execute(query::expense::List::by(read::expense::list::Filter {
            property_id,
        }))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(expenses.into_iter().map(Into::into).collect()))
}

/// Returns the [`Expense`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Detailed>, Error> {
    let id = super::id(&id, ExpenseError::NotFound)?;
    service
        .execute(query::expense::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|e| Json(e.into()))
        .ok_or_else(|| ExpenseError::NotFound.into())
}

/// Creates a new [`Expense`].
#[tracing::instrument(skip_all)]
pub async fn create(
    Extension(service): Extension<Service>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Created<Detailed>, Error> {
    let Fields {
        property_id,
        description,
        amount,
        category,
        date,
        notes,
    } = input.parse()?;

    let expense = service
        .execute(command::CreateExpense {
            property_id,
            description,
            amount,
            category,
            date,
            notes,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Created(expense.into()))
}

/// Updates the [`Expense`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Json<Detailed>, Error> {
    let expense_id = super::id(&id, ExpenseError::NotFound)?;
    let Fields {
        property_id,
        description,
        amount,
        category,
        date,
        notes,
    } = input.parse()?;

    let expense = service
        .execute(command::UpdateExpense {
            expense_id,
            property_id,
            description,
            amount,
            category,
            date,
            notes,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(expense.into()))
}

/// Deletes the [`Expense`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, Error> {
    let expense_id = super::id(&id, ExpenseError::NotFound)?;
    service
        .execute(command::DeleteExpense { expense_id })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(Deleted {
        message: "Expense deleted successfully",
    }))
}

impl AsError for command::create_expense::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(PropertyError::NotFound.into()),
        }
    }
}

impl AsError for command::update_expense::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ExpenseNotExists(_) => Some(ExpenseError::NotFound.into()),
            Self::PropertyNotExists(_) => Some(PropertyError::NotFound.into()),
        }
    }
}

impl AsError for command::delete_expense::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ExpenseNotExists(_) => Some(ExpenseError::NotFound.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use super::Input;

    #[test]
    fn requires_category_and_date() {
        let err = serde_json::from_value::<Input>(json!({
            "propertyId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "description": "Roof repair",
            "amount": 350,
            "category": "  ",
        }))
        .unwrap()
        .parse()
        .err()
        .unwrap();

        let messages = err
            .issues
            .iter()
            .map(|i| (i.path.join("."), i.message.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            [
                ("category".to_owned(), "Category is required".to_owned()),
                ("date".to_owned(), "Date is required".to_owned()),
            ],
        );
    }
}
