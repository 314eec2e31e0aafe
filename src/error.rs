//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of email and password.
    ///
    /// An unknown email and a wrong password produce the same error so that
    /// the client cannot probe which email addresses are registered.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email address is already registered to a user.
    #[error("the email address is already in use")]
    EmailTaken,

    /// The category filter on a transaction listing did not match any entry
    /// of the category catalog.
    #[error("category not found")]
    UnknownCategory,

    /// A transaction payload carried a negative amount.
    ///
    /// Amounts are magnitudes; direction is expressed by the transaction
    /// kind.
    #[error("transaction amounts must not be negative")]
    NegativeAmount,

    /// An update matched zero rows, either because the transaction does not
    /// exist or because it belongs to another user.
    #[error("could not update the transaction")]
    InvalidEdit,

    /// The requested resource was not found.
    ///
    /// This is also returned when a resource exists but belongs to another
    /// user, so that ownership mismatches are indistinguishable from
    /// nonexistence.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred in the password hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// never sent to the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A write violated a database constraint, e.g. a transaction referenced
    /// a category that does not exist.
    #[error("a database constraint was violated: {0}")]
    ConstraintViolation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::EmailTaken
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 787 =>
            {
                Error::ConstraintViolation(desc.clone())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::EmailTaken | Error::UnknownCategory | Error::NegativeAmount
            | Error::InvalidEdit => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
