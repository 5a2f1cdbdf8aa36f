//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the expenses page.
pub const ROOT: &str = "/";
/// The page for the expense ledger and its summary statistics.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for splitting a bill between a group of people.
pub const SPLIT_VIEW: &str = "/split";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create an expense.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to delete a single expense.
pub const DELETE_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to set the initial balance.
pub const INITIAL_BALANCE: &str = "/api/balance";

/// The route to add a participant to the bill splitter.
pub const PARTICIPANTS: &str = "/api/split/participants";
/// The route to remove a participant from the bill splitter.
pub const DELETE_PARTICIPANT: &str = "/api/split/participants/{participant_id}";
/// The route to set the total bill amount.
pub const TOTAL_BILL: &str = "/api/split/bill";
/// The route to mark or unmark a participant as a payer.
pub const PAYER: &str = "/api/split/payers/{participant_id}";
/// The route to set how much a payer paid.
pub const PAID_AMOUNT: &str = "/api/split/payers/{participant_id}/amount";
/// The route to mark or unmark a participant as someone who shares the bill.
pub const SPLITTER: &str = "/api/split/splitters/{participant_id}";
/// The route to work out who owes whom.
pub const CALCULATE_SPLIT: &str = "/api/split/calculate";
/// The route to clear the bill splitter.
pub const RESET_SPLIT: &str = "/api/split/reset";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SPLIT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::EXPENSES_API);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::INITIAL_BALANCE);
        assert_endpoint_is_valid_uri(endpoints::PARTICIPANTS);
        assert_endpoint_is_valid_uri(endpoints::DELETE_PARTICIPANT);
        assert_endpoint_is_valid_uri(endpoints::TOTAL_BILL);
        assert_endpoint_is_valid_uri(endpoints::PAYER);
        assert_endpoint_is_valid_uri(endpoints::PAID_AMOUNT);
        assert_endpoint_is_valid_uri(endpoints::SPLITTER);
        assert_endpoint_is_valid_uri(endpoints::CALCULATE_SPLIT);
        assert_endpoint_is_valid_uri(endpoints::RESET_SPLIT);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // String IDs work the same as integer IDs.
        let formatted_path = format_endpoint("/hello/{world}", "1700000000000");

        assert_eq!(formatted_path, "/hello/1700000000000");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::PAID_AMOUNT, 7);

        assert_eq!(formatted_path, "/api/split/payers/7/amount");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
