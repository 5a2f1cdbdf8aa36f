//! Defines the endpoint for deleting an expense.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::Error;

use super::{
    core::ExpenseId,
    page::{ExpenseState, Notice},
    store::delete_expense,
};

/// A route handler for deleting an expense, redirects to the ledger on success.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(&expense_id, &connection) {
        Ok(expense) => {
            tracing::debug!("deleted expense {} ({})", expense.id, expense.description);

            (
                HxRedirect(Notice::ExpenseDeleted.redirect_url()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::debug!("could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::{date, datetime};

    use crate::{
        db::initialize,
        expense::{
            core::{Category, Expense, ExpenseId},
            page::{ExpenseState, Notice},
            store::{add_expense, get_expenses},
        },
        test_utils::assert_hx_redirect,
    };

    use super::delete_expense_endpoint;

    fn get_test_state() -> ExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
            budget_limit: 3500.0,
        }
    }

    fn add(description: &str, state: &ExpenseState) -> Expense {
        add_expense(
            Expense::build(5.0, Category::Transport, description, date!(2025 - 10 - 05)),
            datetime!(2025-10-05 12:00:00 UTC),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn can_delete_expense() {
        let state = get_test_state();
        let bus = add("Bus", &state);
        let train = add("Train", &state);

        let response = delete_expense_endpoint(State(state.clone()), Path(bus.id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, &Notice::ExpenseDeleted.redirect_url());
        let expenses = get_expenses(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(expenses, vec![train]);
    }

    #[tokio::test]
    async fn deleting_missing_expense_is_not_found() {
        let state = get_test_state();
        let bus = add("Bus", &state);
        let missing = ExpenseId::new_unique(datetime!(2000-01-01 0:00 UTC), &[]);

        let response = delete_expense_endpoint(State(state.clone()), Path(missing)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let expenses = get_expenses(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(expenses, vec![bus]);
    }
}
