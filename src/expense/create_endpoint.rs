//! Defines the endpoint for adding an expense to the ledger.
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
use time::{Date, OffsetDateTime};

use crate::{Error, timezone::local_now};

use super::{
    core::{Category, Expense},
    page::{ExpenseState, Notice},
    store::add_expense,
};

/// The form data for adding an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// The amount spent in dollars.
    pub amount: Option<f64>,
    /// The category name, e.g. "food".
    pub category: Option<String>,
    /// What the money was spent on.
    #[serde(default)]
    pub description: String,
    /// When the money was spent, defaults to today.
    pub date: Option<Date>,
    #[serde(default)]
    pub notes: String,
}

/// A route handler for adding an expense, redirects to the ledger on success.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    match create_expense(&state, form) {
        Ok(expense) => {
            tracing::debug!("added expense {}", expense.id);

            (
                HxRedirect(Notice::ExpenseAdded.redirect_url()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::debug!("rejected new expense: {error}");
            error.into_alert_response()
        }
    }
}

fn create_expense(state: &ExpenseState, form: ExpenseForm) -> Result<Expense, Error> {
    let amount = form.amount.ok_or(Error::MissingField("amount"))?;
    let category = match form.category.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.parse::<Category>()?,
        _ => return Err(Error::MissingField("category")),
    };
    if form.description.trim().is_empty() {
        return Err(Error::MissingField("description"));
    }

    let date = match form.date {
        Some(date) => date,
        None => local_now(&state.local_timezone)?.date(),
    };

    let builder = Expense::build(amount, category, &form.description, date).notes(&form.notes);

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    add_expense(builder, OffsetDateTime::now_utc(), &connection)
}
