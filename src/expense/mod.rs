//! The expense ledger.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model, its categories and `ExpenseBuilder` for creating expenses
//! - Functions for loading and saving the ledger and the initial balance
//! - The summary statistics and category chart shown on the ledger page
//! - View handlers for the ledger page and its forms

mod balance_endpoint;
mod charts;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod page;
mod store;
mod summary;

pub use balance_endpoint::set_initial_balance_endpoint;
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use page::get_expenses_page;
