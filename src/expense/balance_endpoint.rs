//! Defines the endpoint for setting the initial balance.
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::Error;

use super::{
    page::{ExpenseState, Notice},
    store::set_initial_balance,
};

/// The form data for setting the initial balance.
#[derive(Debug, Deserialize)]
pub struct BalanceForm {
    /// The balance in dollars.
    pub initial_balance: Option<f64>,
}

/// A route handler for setting the initial balance, redirects to the ledger on success.
pub async fn set_initial_balance_endpoint(
    State(state): State<ExpenseState>,
    Form(form): Form<BalanceForm>,
) -> Response {
    let Some(balance) = form.initial_balance else {
        return Error::MissingField("initial balance").into_alert_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = set_initial_balance(balance, &connection) {
        tracing::debug!("rejected initial balance: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(Notice::BalanceSaved.redirect_url()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
