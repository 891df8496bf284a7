//! FinaTrak is a web app for tracking personal finances across several accounts.
//!
//! This library provides a REST API that directly serves HTML pages: transactions,
//! recurring budget lines, savings goals, monthly summaries and a dashboard, all
//! scoped to the account the user currently has selected.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod auth;
mod budget;
mod category;
mod charts;
mod dashboard;
mod db;
mod demo;
mod endpoints;
mod goal;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod reorder;
mod routing;
mod settings;
mod summary;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, UserID, ValidatedPassword};
pub use db::initialize as initialize_db;
pub use demo::populate_demo_data;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundPage};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an unknown email or the wrong password.
    #[error("Incorrect email or password.")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth cookie could not be parsed or has expired.
    #[error("the auth cookie is invalid")]
    InvalidCookie,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// A user with the email address is already registered.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// A required text field was empty or only whitespace.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// An amount that must be strictly positive was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveAmount(&'static str),

    /// An amount that must not be negative was negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// An amount was NaN or infinite.
    #[error("{0} must be a finite number")]
    NonFiniteAmount(&'static str),

    /// A goal progress amount was negative or not a number.
    #[error("Invalid amount")]
    InvalidAmount,

    /// The user tried to delete the only account they have.
    #[error("Cannot delete the last account")]
    LastAccount,

    /// The account ID does not refer to an account owned by the user.
    #[error("the account does not exist")]
    InvalidAccount,

    /// The category ID does not refer to a valid category.
    #[error("the category does not exist")]
    InvalidCategory,

    /// The budget item ID does not refer to a budget item in the same account.
    #[error("the budget item does not exist")]
    InvalidBudgetItem,

    /// The goal ID does not refer to a goal in the same account.
    #[error("the goal does not exist")]
    InvalidGoal,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a budget item that does not exist
    #[error("tried to update a budget item that is not in the database")]
    UpdateMissingBudgetItem,

    /// Tried to delete a budget item that does not exist
    #[error("tried to delete a budget item that is not in the database")]
    DeleteMissingBudgetItem,

    /// Tried to update a goal that does not exist
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a goal that does not exist
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
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
        match self {
            Error::NotFound => NotFoundPage.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for htmx requests.
    fn into_alert_response(self) -> Response {
        let (status, message, details) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::LastAccount => (
                StatusCode::BAD_REQUEST,
                "Could not delete account",
                "Cannot delete the last account. Create another account first.".to_owned(),
            ),
            Error::InvalidAccount => (
                StatusCode::BAD_REQUEST,
                "Invalid account",
                "The account could not be found. Try refreshing the page.".to_owned(),
            ),
            Error::InvalidCategory => (
                StatusCode::BAD_REQUEST,
                "Invalid category",
                "The selected category could not be found.".to_owned(),
            ),
            Error::InvalidBudgetItem => (
                StatusCode::BAD_REQUEST,
                "Invalid budget item",
                "The selected budget item could not be found in this account.".to_owned(),
            ),
            Error::InvalidGoal => (
                StatusCode::BAD_REQUEST,
                "Invalid goal",
                "The selected goal could not be found in this account.".to_owned(),
            ),
            error @ (Error::EmptyField(_)
            | Error::NonPositiveAmount(_)
            | Error::NegativeAmount(_)
            | Error::NonFiniteAmount(_)
            | Error::InvalidAmount) => (
                StatusCode::BAD_REQUEST,
                "Invalid input",
                error.to_string(),
            ),
            Error::UpdateMissingAccount => (
                StatusCode::NOT_FOUND,
                "Could not update account",
                "The account could not be found.".to_owned(),
            ),
            Error::DeleteMissingAccount => (
                StatusCode::NOT_FOUND,
                "Could not delete account",
                "The account could not be found. \
                Try refreshing the page to see if the account has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not update transaction",
                "The transaction could not be found.".to_owned(),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingBudgetItem => (
                StatusCode::NOT_FOUND,
                "Could not update budget item",
                "The budget item could not be found.".to_owned(),
            ),
            Error::DeleteMissingBudgetItem => (
                StatusCode::NOT_FOUND,
                "Could not delete budget item",
                "The budget item could not be found. \
                Try refreshing the page to see if the budget item has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingGoal => (
                StatusCode::NOT_FOUND,
                "Could not update goal",
                "The goal could not be found.".to_owned(),
            ),
            Error::DeleteMissingGoal => (
                StatusCode::NOT_FOUND,
                "Could not delete goal",
                "The goal could not be found. \
                Try refreshing the page to see if the goal has already been deleted."
                    .to_owned(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.".to_owned(),
            ),
        };

        (
            status,
            Alert::Error {
                message: message.to_owned(),
                details,
            },
        )
            .into_response()
    }
}
