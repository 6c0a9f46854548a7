//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::tag_report::TagId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A named procedure or table query failed in the data store.
    ///
    /// `name` is the procedure or table that was being called so that the
    /// failure can be traced back to the store.
    #[error("remote call \"{name}\" failed: {message}")]
    RemoteCall { name: String, message: String },

    /// The data store returned a row or scalar that does not match the shape
    /// the caller expected.
    #[error("unexpected data from \"{source_name}\": {message}")]
    MalformedRow {
        source_name: String,
        message: String,
    },

    /// A query parameter was present but could not be interpreted.
    #[error("invalid parameter \"{name}\": {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A required query parameter was not provided.
    #[error("missing required parameter \"{0}\"")]
    MissingParameter(String),

    /// The raw query string could not be decoded.
    #[error("could not decode the query string: {0}")]
    InvalidQueryString(String),

    /// The tag ID does not refer to an existing tag.
    #[error("tag {0} not found")]
    TagNotFound(TagId),

    /// The requested reporting period does not exist.
    #[error("unknown period \"{0}\"")]
    UnknownPeriod(String),

    /// The requested route does not exist.
    #[error("Invalid endpoint")]
    InvalidEndpoint,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The data store could not be opened or initialized.
    #[error("the data store is unavailable: {0}")]
    StoreUnavailable(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl Error {
    /// Wrap a failure from the data store, keeping the procedure or table name.
    pub fn remote_call(name: &str, error: impl std::fmt::Display) -> Self {
        Error::RemoteCall {
            name: name.to_owned(),
            message: error.to_string(),
        }
    }

    /// Report a row that did not decode into its expected shape.
    pub fn malformed_row(source_name: &str, error: impl std::fmt::Display) -> Self {
        Error::MalformedRow {
            source_name: source_name.to_owned(),
            message: error.to_string(),
        }
    }

    /// Report a query parameter that is present but invalid.
    pub fn invalid_parameter(name: &str, reason: impl std::fmt::Display) -> Self {
        Error::InvalidParameter {
            name: name.to_owned(),
            reason: reason.to_string(),
        }
    }

    /// The HTTP status code the error should be reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidParameter { .. }
            | Error::MissingParameter(_)
            | Error::InvalidQueryString(_) => StatusCode::BAD_REQUEST,
            Error::TagNotFound(_) | Error::UnknownPeriod(_) | Error::InvalidEndpoint => {
                StatusCode::NOT_FOUND
            }
            Error::RemoteCall { .. }
            | Error::MalformedRow { .. }
            | Error::DatabaseLockError
            | Error::StoreUnavailable(_)
            | Error::InvalidTimezone(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (
            status_code,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
