//! [`Payment`]-related definitions.

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use common::{datetime::serde::rfc3339, Amount, Date, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{
        self,
        payment::{self, MonthsCovered},
        tenant, unit,
    },
    query::{self, Query as _},
    read,
};
use validator::Validate;

use crate::{
    api::{
        tenant::{Tenant, TenantError},
        unit::{UnitError, WithProperty},
        Created, Deleted,
    },
    define_error, AsError, Error, Service,
};

use super::input;

define_error! {
    enum PaymentError {
        #[code = "PAYMENT_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Payment not found"]
        NotFound,

        #[code = "PERIOD_OUT_OF_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "Payment period is out of the supported date range"]
        PeriodOutOfRange,
    }
}

/// Rent paid by a [`Tenant`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: payment::Id,

    /// ID of the [`Tenant`] who made this [`Payment`].
    pub tenant_id: tenant::Id,

    /// ID of the unit this [`Payment`] is made for.
    pub unit_id: unit::Id,

    /// Paid amount.
    pub amount: Amount,

    /// [`Date`] this [`Payment`] was made on.
    pub payment_date: Date,

    /// Number of calendar months this [`Payment`] covers.
    pub months_covered: MonthsCovered,

    /// First day of the period this [`Payment`] covers.
    pub period_start: Date,

    /// Last day of the period this [`Payment`] covers.
    pub period_end: Date,

    /// Method this [`Payment`] was made with.
    pub payment_method: Option<payment::Method>,

    /// External reference of this [`Payment`].
    pub reference: Option<payment::Reference>,

    /// Additional notes about this [`Payment`].
    pub notes: Option<payment::Notes>,

    /// Status of this [`Payment`].
    pub status: payment::Status,

    /// Indicator whether a receipt of this [`Payment`] has been emailed.
    pub receipt_sent: bool,

    /// When this [`Payment`] was created.
    #[serde(serialize_with = "rfc3339::serialize")]
    pub created_at: payment::CreationDateTime,
}

impl From<domain::Payment> for Payment {
    fn from(payment: domain::Payment) -> Self {
        let domain::Payment {
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
        Self {
            id,
            tenant_id,
            unit_id,
            amount,
            payment_date,
            months_covered,
            period_start: period.start,
            period_end: period.end,
            payment_method: method,
            reference,
            notes,
            status,
            receipt_sent,
            created_at,
        }
    }
}

/// [`Payment`] along with its [`Tenant`] and unit.
#[derive(Clone, Debug, Serialize)]
pub struct Detailed {
    /// The [`Payment`] itself.
    #[serde(flatten)]
    pub payment: Payment,

    /// [`Tenant`] who made the [`Payment`].
    pub tenant: Tenant,

    /// Unit the [`Payment`] is made for, along with its property.
    pub unit: WithProperty,
}

impl From<read::payment::Detailed> for Detailed {
    fn from(detailed: read::payment::Detailed) -> Self {
        let read::payment::Detailed {
            payment,
            tenant,
            unit,
            property,
        } = detailed;
        Self {
            payment: payment.into(),
            tenant: tenant.into(),
            unit: read::unit::WithProperty { unit, property }.into(),
        }
    }
}

/// Newly recorded [`Payment`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recorded {
    /// The recorded [`Payment`] itself.
    #[serde(flatten)]
    pub payment: Detailed,

    /// Message about a failed receipt delivery, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<&'static str>,
}

impl From<command::record_payment::Output> for Recorded {
    fn from(out: command::record_payment::Output) -> Self {
        let command::record_payment::Output {
            payment,
            delivery_error,
        } = out;
        Self {
            payment: payment.into(),
            email_error: delivery_error
                .is_some()
                .then_some("Failed to send receipt email"),
        }
    }
}

/// Rent schedule of an active [`Tenant`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Upcoming {
    /// ID of the [`Tenant`].
    pub tenant_id: tenant::Id,

    /// Name of the [`Tenant`].
    pub tenant_name: tenant::Name,

    /// Email address of the [`Tenant`].
    pub tenant_email: tenant::Email,

    /// Name of the rented unit.
    pub unit_name: unit::Name,

    /// Code of the rented unit.
    pub unit_code: unit::Code,

    /// Name of the property the rented unit belongs to.
    pub property_name: domain::property::Name,

    /// Monthly rent of the rented unit.
    pub rent_amount: Amount,

    /// [`Date`] the next [`Payment`] is due on.
    pub next_due_date: Date,

    /// [`Date`] the latest [`Payment`] was made on.
    pub last_payment_date: Option<Date>,

    /// Last day of the period covered by the latest [`Payment`].
    pub last_payment_period_end: Option<Date>,

    /// Indicator whether the next [`Payment`] is overdue.
    pub is_overdue: bool,

    /// Indicator whether the next [`Payment`] is due this month.
    pub is_due_this_month: bool,

    /// Indicator whether the next [`Payment`] is due next month.
    pub is_due_next_month: bool,

    /// Number of whole days the next [`Payment`] is overdue.
    pub days_overdue: u32,
}

impl From<read::schedule::Entry> for Upcoming {
    fn from(entry: read::schedule::Entry) -> Self {
        let read::schedule::Entry {
            tenant,
            unit,
            property,
            latest_payment,
            schedule,
        } = entry;
        Self {
            tenant_id: tenant.id,
            tenant_name: tenant.name,
            tenant_email: tenant.email,
            unit_name: unit.name,
            unit_code: unit.code,
            property_name: property.name,
            rent_amount: unit.rent_amount,
            next_due_date: schedule.next_due_date,
            last_payment_date: latest_payment.as_ref().map(|p| p.payment_date),
            last_payment_period_end: latest_payment.map(|p| p.period.end),
            is_overdue: schedule.is_overdue,
            is_due_this_month: schedule.is_due_this_month,
            is_due_next_month: schedule.is_due_next_month,
            days_overdue: schedule.days_overdue,
        }
    }
}

/// [`Upcoming`] rent schedules grouped by urgency.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingGroups {
    /// Schedules whose next [`Payment`] is overdue.
    pub overdue: Vec<Upcoming>,

    /// Schedules whose next [`Payment`] is due this month and isn't
    /// overdue.
    pub due_this_month: Vec<Upcoming>,

    /// Schedules whose next [`Payment`] is due next month.
    pub due_next_month: Vec<Upcoming>,

    /// All the schedules, the earliest due first.
    pub all: Vec<Upcoming>,
}

impl From<read::schedule::Upcoming> for UpcomingGroups {
    fn from(upcoming: read::schedule::Upcoming) -> Self {
        let read::schedule::Upcoming {
            overdue,
            due_this_month,
            due_next_month,
            all,
        } = upcoming;
        let convert = |entries: Vec<read::schedule::Entry>| -> Vec<Upcoming> {
            entries.into_iter().map(Into::into).collect()
        };
        Self {
            overdue: convert(overdue),
            due_this_month: convert(due_this_month),
            due_next_month: convert(due_next_month),
            all: convert(all),
        }
    }
}

/// Input for recording or updating a [`Payment`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// ID of the [`Tenant`] who made the [`Payment`].
    #[validate(
        required(message = "Tenant is required"),
        custom(function = "input::non_blank", message = "Tenant is required")
    )]
    pub tenant_id: Option<String>,

    /// ID of the unit the [`Payment`] is made for.
    #[validate(
        required(message = "Unit is required"),
        custom(function = "input::non_blank", message = "Unit is required")
    )]
    pub unit_id: Option<String>,

    /// Paid amount.
    #[validate(
        required(message = "Amount is required"),
        custom(function = "input::positive", message = "Amount must be positive")
    )]
    pub amount: Option<Decimal>,

    /// [`Date`] the [`Payment`] was made on.
    #[validate(
        required(message = "Payment date is required"),
        custom(function = "input::date", message = "Payment date is required")
    )]
    pub payment_date: Option<String>,

    /// Number of calendar months the [`Payment`] covers.
    #[validate(
        required(message = "Months covered is required"),
        range(min = 1, message = "Months covered must be at least 1")
    )]
    pub months_covered: Option<i32>,

    /// Method the [`Payment`] was made with.
    #[validate(length(max = 64, message = "Payment method is too long"))]
    pub payment_method: Option<String>,

    /// External reference of the [`Payment`].
    #[validate(length(max = 255, message = "Reference is too long"))]
    pub reference: Option<String>,

    /// Additional notes about the [`Payment`].
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Fields of a [`Payment`] parsed from an [`Input`].
struct Fields {
    tenant_id: tenant::Id,
    unit_id: unit::Id,
    amount: Amount,
    payment_date: Date,
    months_covered: MonthsCovered,
    method: Option<payment::Method>,
    reference: Option<payment::Reference>,
    notes: Option<payment::Notes>,
}

impl Input {
    /// Checks this [`Input`] and parses it into [`Fields`].
    fn parse(self) -> Result<Fields, Error> {
        self.validate().map_err(AsError::into_error)?;

        let Self {
            tenant_id,
            unit_id,
            amount,
            payment_date,
            months_covered,
            payment_method,
            reference,
            notes,
        } = self;
        Ok(Fields {
            tenant_id: super::id(
                &input::field("tenant_id", tenant_id, Some)?,
                TenantError::NotFound,
            )?,
            unit_id: super::id(
                &input::field("unit_id", unit_id, Some)?,
                UnitError::NotFound,
            )?,
            amount: input::field("amount", amount, Amount::new)?,
            payment_date: input::field("payment_date", payment_date, |d| {
                Date::parse(&d).ok()
            })?,
            months_covered: input::field(
                "months_covered",
                months_covered,
                MonthsCovered::new,
            )?,
            method: input::optional("payment_method", payment_method)?,
            reference: input::optional("reference", reference)?,
            notes: input::optional("notes", notes)?,
        })
    }
}

/// Query parameters of a [`Payment`]s list.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Status to list the [`Payment`]s with.
    pub status: Option<String>,

    /// ID of the [`Tenant`] to list the [`Payment`]s of.
    pub tenant_id: Option<String>,
}

impl ListParams {
    /// Converts these [`ListParams`] into a [`Payment`]s list filter.
    ///
    /// [`None`] is returned if no [`Payment`] can match these [`ListParams`].
    fn filter(self) -> Option<read::payment::list::Filter> {
        let Self { status, tenant_id } = self;
        let status = status.map(|s| s.parse()).transpose().ok()?;
        let tenant_id = tenant_id.map(|id| id.parse()).transpose().ok()?;
        Some(read::payment::list::Filter {
            status,
            tenant_id,
            limit: None,
        })
    }
}

/// Lists the [`Payment`]s matching the provided [`ListParams`], the most
/// recently made first.
#[tracing::instrument(skip_all)]
pub async fn list(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, Error>,
) -> Result<Json<Vec<Detailed>>, Error> {
    let Some(filter) = params.filter() else {
        return Ok(Json(Vec::new()));
    };
    let payments = service
        .execute(query::payment::List::by(filter))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// Returns the [`Payment`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Detailed>, Error> {
    let id = super::id(&id, PaymentError::NotFound)?;
    service
        .execute(query::payment::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|p| Json(p.into()))
        .ok_or_else(|| PaymentError::NotFound.into())
}

/// Records a new [`Payment`] and emails its receipt to the [`Tenant`].
///
/// A failed receipt delivery doesn't fail the recording.
#[tracing::instrument(skip_all)]
pub async fn create(
    Extension(service): Extension<Service>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Created<Recorded>, Error> {
    let Fields {
        tenant_id,
        unit_id,
        amount,
        payment_date,
        months_covered,
        method,
        reference,
        notes,
    } = input.parse()?;

    let recorded = service
        .execute(command::RecordPayment {
            tenant_id,
            unit_id,
            amount,
            payment_date,
            months_covered,
            method,
            reference,
            notes,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Created(recorded.into()))
}

/// Updates the [`Payment`] with the provided ID, recomputing its period.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<Input>, Error>,
) -> Result<Json<Detailed>, Error> {
    let payment_id = super::id(&id, PaymentError::NotFound)?;
    let Fields {
        tenant_id,
        unit_id,
        amount,
        payment_date,
        months_covered,
        method,
        reference,
        notes,
    } = input.parse()?;

    let payment = service
        .execute(command::UpdatePayment {
            payment_id,
            tenant_id,
            unit_id,
            amount,
            payment_date,
            months_covered,
            method,
            reference,
            notes,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(payment.into()))
}

/// Deletes the [`Payment`] with the provided ID.
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, Error> {
    let payment_id = super::id(&id, PaymentError::NotFound)?;
    service
        .execute(command::DeletePayment { payment_id })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(Deleted {
        message: "Payment deleted successfully",
    }))
}

/// Projects the rent schedules of all the active [`Tenant`]s as of now.
#[tracing::instrument(skip_all)]
pub async fn upcoming(
    Extension(service): Extension<Service>,
) -> Result<Json<UpcomingGroups>, Error> {
    let upcoming = service
        .execute(query::UpcomingPayments {
            now: DateTime::now(),
        })
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(upcoming.into()))
}

impl AsError for command::record_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PeriodOutOfRange => Some(PaymentError::PeriodOutOfRange.into()),
            Self::TenantNotExists(_) => Some(TenantError::NotFound.into()),
            Self::UnitNotExists(_) => Some(UnitError::NotFound.into()),
        }
    }
}

impl AsError for command::update_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PaymentNotExists(_) => Some(PaymentError::NotFound.into()),
            Self::PeriodOutOfRange => Some(PaymentError::PeriodOutOfRange.into()),
            Self::TenantNotExists(_) => Some(TenantError::NotFound.into()),
            Self::UnitNotExists(_) => Some(UnitError::NotFound.into()),
        }
    }
}

impl AsError for command::delete_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PaymentNotExists(_) => Some(PaymentError::NotFound.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, DateTime};
    use serde_json::json;
    use service::{
        command::record_payment,
        domain::{
            payment::{self, MonthsCovered, Period},
            property, tenant, unit, Payment, Property, Tenant, Unit,
        },
        infra::mailer,
        read,
    };

    use super::{Input, ListParams, Recorded};

    fn recorded(receipt_sent: bool) -> read::payment::Detailed {
        let now = DateTime::now();
        let property = Property {
            id: property::Id::new(),
            code: property::Code::new("SV").unwrap(),
            name: property::Name::new("Sunset Villas").unwrap(),
            address: property::Address::new("12 Kampala Rd").unwrap(),
            description: None,
            created_at: now.coerce(),
        };
        let unit = Unit {
            id: unit::Id::new(),
            property_id: property.id,
            code: unit::Code::new("A-1").unwrap(),
            name: unit::Name::new("Apartment 1").unwrap(),
            rent_amount: "1200".parse().unwrap(),
            status: unit::Status::Occupied,
            created_at: now.coerce(),
        };
        let tenant = Tenant {
            id: tenant::Id::new(),
            unit_id: unit.id,
            name: tenant::Name::new("Jane Doe").unwrap(),
            email: tenant::Email::new("jane@example.com").unwrap(),
            phone: tenant::Phone::new("+256 700 000000").unwrap(),
            start_date: Date::parse("2024-01-15").unwrap(),
            status: tenant::Status::Active,
            created_at: now.coerce(),
        };
        let payment = Payment {
            id: payment::Id::new(),
            tenant_id: tenant.id,
            unit_id: unit.id,
            amount: "1200".parse().unwrap(),
            payment_date: Date::parse("2024-01-15").unwrap(),
            months_covered: MonthsCovered::new(1).unwrap(),
            period: Period {
                start: Date::parse("2024-01-15").unwrap(),
                end: Date::parse("2024-02-14").unwrap(),
            },
            method: None,
            reference: None,
            notes: None,
            status: payment::Status::Completed,
            receipt_sent,
            created_at: now.coerce(),
        };
        read::payment::Detailed {
            payment,
            tenant,
            unit,
            property,
        }
    }

    fn input(value: serde_json::Value) -> Input {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_valid_input() {
        let fields = input(json!({
            "tenantId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "unitId": "936da01f-9abd-4d9d-80c7-02af85c822a8",
            "amount": "2400.50",
            "paymentDate": "2024-02-16",
            "monthsCovered": 2,
            "paymentMethod": "Bank transfer",
            "reference": "",
        }))
        .parse()
        .ok()
        .unwrap();

        assert_eq!(fields.amount.to_string(), "2400.50");
        assert_eq!(i32::from(fields.months_covered), 2);
        assert_eq!(fields.method.unwrap().to_string(), "Bank transfer");
        assert!(fields.reference.is_none());
        assert!(fields.notes.is_none());
    }

    #[test]
    fn lists_every_failing_field() {
        let err = input(json!({
            "tenantId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "amount": -5,
            "paymentDate": "yesterday",
            "monthsCovered": 0,
        }))
        .parse()
        .err()
        .unwrap();

        let paths = err
            .issues
            .iter()
            .map(|i| i.path.join("."))
            .collect::<Vec<_>>();
        assert_eq!(
            paths,
            ["amount", "monthsCovered", "paymentDate", "unitId"],
        );
        assert_eq!(err.issues[1].message, "Months covered must be at least 1");
    }

    #[test]
    fn unmatchable_filter_lists_nothing() {
        let params = |status: Option<&str>, tenant_id: Option<&str>| {
            ListParams {
                status: status.map(Into::into),
                tenant_id: tenant_id.map(Into::into),
            }
            .filter()
        };

        assert!(params(None, None).is_some());
        assert!(params(Some("completed"), None).is_some());
        assert!(params(Some("pending"), None).is_none());
        assert!(params(None, Some("nope")).is_none());
    }

    #[test]
    fn reports_failed_receipt_delivery() {
        let out = record_payment::Output {
            payment: recorded(false),
            delivery_error: Some(tracerr::new!(mailer::Error::InvalidAddress(
                "jane@example.com".into(),
            ))),
        };

        let body = serde_json::to_value(Recorded::from(out)).unwrap();

        assert_eq!(body["receiptSent"], json!(false));
        assert_eq!(body["emailError"], json!("Failed to send receipt email"));
        assert_eq!(body["status"], json!("completed"));
        assert_eq!(body["periodStart"], json!("2024-01-15"));
        assert_eq!(body["periodEnd"], json!("2024-02-14"));
        assert_eq!(body["tenant"]["status"], json!("active"));
        assert_eq!(body["unit"]["status"], json!("occupied"));
    }

    #[test]
    fn omits_email_error_on_delivery() {
        let out = record_payment::Output {
            payment: recorded(true),
            delivery_error: None,
        };

        let body = serde_json::to_value(Recorded::from(out)).unwrap();

        assert_eq!(body["receiptSent"], json!(true));
        assert!(body.get("emailError").is_none());
    }
}
