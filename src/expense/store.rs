//! Loads and saves the expense ledger and the initial balance.
//!
//! The whole list of expenses is stored as one JSON array under
//! [EXPENSES_KEY], most recent first. Every change rewrites the full list.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    db::{EXPENSES_KEY, INITIAL_BALANCE_KEY, get_json, get_value, set_json, set_value},
};

use super::core::{Expense, ExpenseBuilder, ExpenseId};

/// Get all expenses, most recent first.
///
/// Returns an empty list if no expenses have been saved yet.
///
/// # Errors
/// This function will return a:
/// - [Error::CorruptedValue] if the saved expenses cannot be parsed,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    Ok(get_json(EXPENSES_KEY, connection)?.unwrap_or_default())
}

fn save_expenses(expenses: &[Expense], connection: &Connection) -> Result<(), Error> {
    set_json(EXPENSES_KEY, expenses, connection)
}

/// Validate `builder` and save the new expense at the head of the list.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::MissingField] if `builder` is invalid,
/// - [Error::CorruptedValue] if the saved expenses cannot be parsed,
/// - or [Error::SqlError] if there is an SQL error.
pub fn add_expense(
    builder: ExpenseBuilder,
    timestamp: OffsetDateTime,
    connection: &Connection,
) -> Result<Expense, Error> {
    let mut expenses = get_expenses(connection)?;
    let expense = builder.finalize(timestamp, &expenses)?;

    expenses.insert(0, expense.clone());
    save_expenses(&expenses, connection)?;

    Ok(expense)
}

/// Delete the expense with the ID `id`, the remaining expenses keep their order.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if there is no expense with the ID `id`,
/// - [Error::CorruptedValue] if the saved expenses cannot be parsed,
/// - or [Error::SqlError] if there is an SQL error.
pub fn delete_expense(id: &ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let mut expenses = get_expenses(connection)?;

    let Some(index) = expenses.iter().position(|expense| &expense.id == id) else {
        return Err(Error::DeleteMissingExpense);
    };

    let expense = expenses.remove(index);
    save_expenses(&expenses, connection)?;

    Ok(expense)
}

/// Get the balance the user started with, zero if it has not been set.
///
/// # Errors
/// This function will return a:
/// - [Error::CorruptedValue] if the saved balance is not a non-negative number,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_initial_balance(connection: &Connection) -> Result<f64, Error> {
    let Some(text) = get_value(INITIAL_BALANCE_KEY, connection)? else {
        return Ok(0.0);
    };

    match text.trim().parse::<f64>() {
        Ok(balance) if balance.is_finite() && balance >= 0.0 => Ok(balance),
        _ => {
            tracing::error!("could not parse the saved initial balance {text:?}");
            Err(Error::CorruptedValue(INITIAL_BALANCE_KEY.to_owned()))
        }
    }
}

/// Set the balance the user started with.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidBalance] if `balance` is negative or not a finite number,
/// - or [Error::SqlError] if there is an SQL error.
pub fn set_initial_balance(balance: f64, connection: &Connection) -> Result<(), Error> {
    if !balance.is_finite() || balance < 0.0 {
        return Err(Error::InvalidBalance(balance));
    }

    set_value(INITIAL_BALANCE_KEY, &balance.to_string(), connection)
}
