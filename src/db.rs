//! The string keyed store that holds the app's persisted state.
//!
//! Values are stored as text in a single SQLite table. Callers that store
//! structured data serialize it as JSON with [get_json] and [set_json].

use rusqlite::{Connection, OptionalExtension};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// The key for the list of expenses, a JSON array ordered most recent first.
pub const EXPENSES_KEY: &str = "expenses";
/// The key for the user's initial balance, a decimal number stored as a string.
pub const INITIAL_BALANCE_KEY: &str = "initialBalance";

/// Create the tables for the application.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_key_value_table(connection)?;

    Ok(())
}

fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Get the raw value stored under `key`, or `None` if nothing has been stored yet.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_value(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    connection
        .query_row("SELECT value FROM key_value WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(Error::from)
}

/// Store `value` under `key`, replacing any existing value.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn set_value(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO key_value (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key, value),
    )?;

    Ok(())
}

/// Get the JSON value stored under `key` as a `T`.
///
/// A missing key is not an error and returns `None`.
///
/// # Errors
/// This function will return a:
/// - [Error::CorruptedValue] if the stored text is not valid JSON for `T`,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_json<T: DeserializeOwned>(key: &str, connection: &Connection) -> Result<Option<T>, Error> {
    let Some(text) = get_value(key, connection)? else {
        return Ok(None);
    };

    serde_json::from_str(&text).map(Some).map_err(|error| {
        tracing::error!("could not parse the value stored under \"{key}\": {error}");
        Error::CorruptedValue(key.to_owned())
    })
}

/// Serialize `value` as JSON and store it under `key`.
///
/// # Errors
/// This function will return a:
/// - [Error::JSONSerializationError] if `value` cannot be serialized,
/// - or [Error::SqlError] if there is an SQL error.
pub fn set_json<T: Serialize + ?Sized>(
    key: &str,
    value: &T,
    connection: &Connection,
) -> Result<(), Error> {
    let text = serde_json::to_string(value)?;

    set_value(key, &text, connection)
}
