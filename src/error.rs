//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, html::format_currency, internal_server_error::InternalServerError,
    not_found::NotFoundError, split::ParticipantId,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field of the expense form was left empty.
    ///
    /// The string names the missing field, e.g. "description".
    #[error("the {0} field is required")]
    MissingField(&'static str),

    /// The category does not match one of the fixed expense categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// An expense was given an amount that is zero, negative or not a number.
    #[error("{0} is not a valid expense amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// The initial balance was negative or not a number.
    #[error("{0} is not a valid balance, the balance must be zero or more")]
    InvalidBalance(f64),

    /// Tried to delete an expense that is not in the ledger.
    #[error("tried to delete an expense that is not in the ledger")]
    DeleteMissingExpense,

    /// An empty string was used as a participant's name.
    #[error("participant name cannot be empty")]
    EmptyParticipantName,

    /// The participant ID does not refer to anyone in the settlement session.
    #[error("there is no participant with the ID {0}")]
    UnknownParticipant(ParticipantId),

    /// A paid amount was entered for a participant that is not marked as a payer.
    #[error("participant {0} is not marked as a payer")]
    PayerNotSelected(ParticipantId),

    /// A paid amount was negative or not a number.
    #[error("{0} is not a valid paid amount, the amount must be zero or more")]
    InvalidPaidAmount(f64),

    /// The total bill amount is missing, not a number or not greater than zero.
    #[error("the total bill amount must be greater than zero")]
    InvalidBillAmount,

    /// Tried to split a bill without selecting anyone to split it between.
    #[error("at least one person must be selected to split the bill")]
    NoSplitters,

    /// The amounts entered for the payers do not add up to the total bill.
    #[error("total paid ({paid}) does not match the bill amount ({bill})")]
    PaidTotalMismatch {
        /// The sum of the amounts entered for each payer.
        paid: f64,
        /// The total bill amount.
        bill: f64,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The value stored under the given key could not be parsed.
    ///
    /// The stored value is left as is so that it can be inspected and repaired.
    #[error("the value stored under the key \"{0}\" is malformed")]
    CorruptedValue(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Could not acquire the lock on the bill splitting session
    #[error("could not acquire the bill splitter lock")]
    SessionLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::CorruptedValue(key) => InternalServerError {
                description: "Could Not Load Your Data",
                fix: &format!(
                    "The saved value for \"{key}\" could not be read. \
                    Check the server logs for more details."
                ),
            }
            .into_response(),
            Error::DatabaseLockError | Error::SessionLockError => {
                InternalServerError::default().into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Please fill in all required fields".to_owned(),
                    details: format!("The {field} field is required."),
                },
            ),
            Error::InvalidCategory(category) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: format!("\"{category}\" is not one of the available categories."),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!("{amount} is not a valid amount. Enter an amount above $0."),
                },
            ),
            Error::InvalidBalance(balance) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid balance".to_owned(),
                    details: format!(
                        "{balance} is not a valid balance. Enter an amount of $0 or more."
                    ),
                },
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete expense".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted."
                        .to_owned(),
                },
            ),
            Error::EmptyParticipantName => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please enter a name".to_owned(),
                },
            ),
            Error::UnknownParticipant(_) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update participant".to_owned(),
                    details: "The participant could not be found. \
                    Try refreshing the page to see the current participants."
                        .to_owned(),
                },
            ),
            Error::PayerNotSelected(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not set paid amount".to_owned(),
                    details: "Select the participant as a payer before entering how much they paid."
                        .to_owned(),
                },
            ),
            Error::InvalidPaidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid paid amount".to_owned(),
                    details: format!(
                        "{amount} is not a valid amount. Enter an amount of $0 or more."
                    ),
                },
            ),
            Error::InvalidBillAmount => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please enter a valid total bill amount".to_owned(),
                },
            ),
            Error::NoSplitters => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Please select at least one person to split the bill".to_owned(),
                },
            ),
            Error::PaidTotalMismatch { paid, bill } => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Amounts do not add up".to_owned(),
                    details: format!(
                        "Total paid ({}) doesn't match bill amount ({})",
                        format_currency(paid),
                        format_currency(bill)
                    ),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::CorruptedValue(key) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Could not load your data".to_owned(),
                    details: format!(
                        "The saved value for \"{key}\" could not be read, so nothing was changed."
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
