//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expenses_page,
        set_initial_balance_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    split::{
        add_participant_endpoint, calculate_split_endpoint, get_split_page,
        remove_participant_endpoint, reset_split_endpoint, set_paid_amount_endpoint,
        set_payer_endpoint, set_splitter_endpoint, set_total_bill_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::SPLIT_VIEW, get(get_split_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let expense_routes = Router::new()
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(endpoints::DELETE_EXPENSE, delete(delete_expense_endpoint))
        .route(endpoints::INITIAL_BALANCE, put(set_initial_balance_endpoint));

    let split_routes = Router::new()
        .route(endpoints::PARTICIPANTS, post(add_participant_endpoint))
        .route(
            endpoints::DELETE_PARTICIPANT,
            delete(remove_participant_endpoint),
        )
        .route(endpoints::TOTAL_BILL, put(set_total_bill_endpoint))
        .route(endpoints::PAYER, put(set_payer_endpoint))
        .route(endpoints::PAID_AMOUNT, put(set_paid_amount_endpoint))
        .route(endpoints::SPLITTER, put(set_splitter_endpoint))
        .route(endpoints::CALCULATE_SPLIT, post(calculate_split_endpoint))
        .route(endpoints::RESET_SPLIT, post(reset_split_endpoint));

    page_routes
        .merge(expense_routes)
        .merge(split_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the expense ledger.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::EXPENSES_VIEW)
}
