//! Defines the app level error type and conversions to JSON and HTML responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::ErrorCode;
use serde::Serialize;

use crate::internal_server_error::InternalServerError;

/// A problem with a single field of a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The name of the offending field as it appears in the JSON payload.
    pub field: &'static str,
    /// A human readable description of what is wrong with the field.
    pub message: String,
}

impl FieldError {
    /// Create a field error for `field` with `message`.
    pub fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_owned(),
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of a transaction or budget failed validation.
    ///
    /// Nothing is written to the database when this error is returned.
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// A budget for the category and month already exists.
    ///
    /// There can be at most one budget per category per month. The client
    /// should edit the existing budget instead.
    #[error("a budget for {category} in {month} already exists")]
    DuplicateBudget {
        /// The category name of the rejected budget.
        category: String,
        /// The month of the rejected budget, e.g. "2024-01".
        month: String,
    },

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The database could not be reached, e.g. it is busy, locked by another
    /// process or the file could not be opened.
    ///
    /// These errors are transient and the client may retry the request.
    #[error("the database is unavailable: {0}")]
    StoreUnavailable(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl Error {
    /// Create a [Error::Validation] for a single field.
    pub fn invalid_field(field: &'static str, message: &str) -> Self {
        Error::Validation(vec![FieldError::new(field, message)])
    }

    /// The field errors of a [Error::Validation], or the error message under
    /// the `body` field for any other error.
    pub fn into_field_errors(self) -> Vec<FieldError> {
        match self {
            Error::Validation(errors) => errors,
            error => vec![FieldError::new("body", &error.to_string())],
        }
    }

    /// Whether the error means the database could not be reached, as opposed
    /// to the database rejecting a query.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Error::DatabaseLockError | Error::StoreUnavailable(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(ref sql_error, _)
                if matches!(
                    sql_error.code,
                    ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                        | ErrorCode::CannotOpen
                        | ErrorCode::SystemIoFailure
                ) =>
            {
                tracing::error!("the database is unavailable: {}", value);
                Error::StoreUnavailable(value.to_string())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::invalid_field("body", &rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::invalid_field("id", &rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::invalid_field("query", &rejection.body_text())
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<ErrorDetails>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorDetails {
    Fields(Vec<FieldError>),
    Message(String),
}

fn json_error(status_code: StatusCode, error: &str, details: Option<ErrorDetails>) -> Response {
    (
        status_code,
        Json(ErrorBody {
            error: error.to_owned(),
            details,
        }),
    )
        .into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(fields) => json_error(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                Some(ErrorDetails::Fields(fields)),
            ),
            Error::NotFound => json_error(StatusCode::NOT_FOUND, "Resource not found", None),
            Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                json_error(StatusCode::NOT_FOUND, "Transaction not found", None)
            }
            Error::UpdateMissingBudget | Error::DeleteMissingBudget => {
                json_error(StatusCode::NOT_FOUND, "Budget not found", None)
            }
            Error::DuplicateBudget { .. } => json_error(
                StatusCode::CONFLICT,
                "Budget already exists for this category and month",
                None,
            ),
            Error::DatabaseLockError | Error::StoreUnavailable(_) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not reach the database",
                Some(ErrorDetails::Message(
                    "Try again later or check the server logs".to_owned(),
                )),
            ),
            Error::InvalidTimezoneError(timezone) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                Some(ErrorDetails::Message(format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ))),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    Some(ErrorDetails::Message(
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                    )),
                )
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTML error page.
    ///
    /// Used by the page handlers, the JSON API uses [IntoResponse].
    pub fn into_html_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError | Error::StoreUnavailable(_) => InternalServerError {
                description: "Could not reach the database",
                fix: "Try again later or check the server logs",
            }
            .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
