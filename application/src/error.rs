//! [`Error`]-related definitions.

use std::{borrow::Cow, fmt};

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use serde::Serialize;
use service::infra::database;
use tracerr::{Trace, Traced};
use tracing as log;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            issues: Vec::new(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// REST API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,

    /// Input [`Issue`]s this [`Error`] is caused by.
    ///
    /// Non-empty only for [`Error::validation()`]s.
    pub issues: Vec<Issue>,
}

impl Error {
    /// Message replacing the details of internal errors in responses.
    pub const INTERNAL_MESSAGE: &'static str = "Internal server error";

    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            issues: Vec::new(),
            backtrace: None,
        }
    }

    /// Creates a new [`Error`] representing invalid input with the provided
    /// [`Issue`]s.
    #[must_use]
    pub fn validation(issues: Vec<Issue>) -> Self {
        Self {
            code: "VALIDATION_ERROR",
            status_code: http::StatusCode::BAD_REQUEST,
            message: issues.iter().map(|i| &i.message).join("; "),
            issues,
            backtrace: None,
        }
    }

    /// Indicates whether details of this [`Error`] must not be exposed to
    /// clients.
    fn is_internal(&self) -> bool {
        self.code == "INTERNAL_SERVER_ERROR"
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
            issues: _,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        /// Envelope of an [`Error`] response.
        #[derive(Serialize)]
        struct Envelope {
            /// Details of the [`Error`].
            error: Body,
        }

        /// Details of an [`Error`] response.
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Body {
            /// Single message.
            Message(String),

            /// List of input [`Issue`]s.
            Issues(Vec<Issue>),
        }

        if self.status_code.is_server_error() {
            log::error!("{self}");
        }

        let body = if !self.issues.is_empty() {
            Body::Issues(self.issues)
        } else if self.is_internal() {
            Body::Message(Self::INTERNAL_MESSAGE.to_owned())
        } else {
            Body::Message(self.message)
        };

        (self.status_code, Json(Envelope { error: body })).into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Single failed check of an input field.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Issue {
    /// Path to the failed field, in the input naming.
    pub path: Vec<String>,

    /// Code of the failed check.
    pub code: Cow<'static, str>,

    /// Human-readable description of the failure.
    pub message: Cow<'static, str>,
}

impl Issue {
    /// Creates a new [`Issue`] of the top-level `field`.
    ///
    /// The `field` is converted to the input naming (`camelCase`).
    #[must_use]
    pub fn new(
        field: &str,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            path: if field.is_empty() {
                vec![]
            } else {
                vec![camel_case(field)]
            },
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Converts the provided `snake_case` identifier into a `camelCase` one.
fn camel_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let mut upper = false;
    for c in ident.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError + fmt::Display> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }

    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error().unwrap_or_else(|| {
            let mut error = Error::internal(&self.as_ref().to_string());
            error.backtrace = Some(self.trace().clone());
            error
        })
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for ValidationErrors {
    fn try_as_error(&self) -> Option<Error> {
        let issues = self
            .errors()
            .iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .flat_map(|(field, kind)| match kind {
                ValidationErrorsKind::Field(errs) => errs
                    .iter()
                    .map(|e| {
                        Issue::new(
                            &field.to_string(),
                            e.code.clone(),
                            e.message.clone().unwrap_or_else(|| {
                                Cow::Owned(format!("Invalid `{field}`"))
                            }),
                        )
                    })
                    .collect::<Vec<_>>(),
                ValidationErrorsKind::Struct(_)
                | ValidationErrorsKind::List(_) => {
                    vec![Issue::new(
                        &field.to_string(),
                        "invalid",
                        "Invalid value",
                    )]
                }
            })
            .collect();
        Some(Error::validation(issues))
    }
}

impl AsError for JsonRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(vec![Issue::new(
            "",
            "invalid_body",
            self.body_text(),
        )]))
    }
}

impl AsError for QueryRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(vec![Issue::new(
            "",
            "invalid_query",
            self.body_text(),
        )]))
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        rejection.into_error()
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        rejection.into_error()
    }
}

#[cfg(test)]
mod spec {
    use axum::{body, response::IntoResponse as _};
    use serde_json::json;

    use crate::define_error;

    use super::{Error, Issue};

    async fn body(err: Error) -> (http::StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn lists_validation_issues() {
        let err = Error::validation(vec![
            Issue::new("rent_amount", "positive", "Rent amount must be positive"),
            Issue::new("code", "required", "Unit code is required"),
        ]);

        let (status, body) = body(err).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": [
                {
                    "path": ["rentAmount"],
                    "code": "positive",
                    "message": "Rent amount must be positive",
                },
                {
                    "path": ["code"],
                    "code": "required",
                    "message": "Unit code is required",
                },
            ]}),
        );
    }

    #[tokio::test]
    async fn hides_internal_details() {
        let (status, body) =
            body(Error::internal(&"connection refused on 10.0.0.1")).await;

        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": Error::INTERNAL_MESSAGE}));
    }

    #[tokio::test]
    async fn exposes_coded_messages() {
        define_error! {
            enum TestError {
                #[code = "TENANT_NOT_FOUND"]
                #[status = NOT_FOUND]
                #[message = "Tenant not found"]
                NotFound,
            }
        }

        let (status, body) = body(TestError::NotFound.into()).await;

        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Tenant not found"}));
    }
}
