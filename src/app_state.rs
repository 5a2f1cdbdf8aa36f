//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, split::SplitSession};

/// The budget limit used when none is configured.
pub const DEFAULT_BUDGET_LIMIT: f64 = 3500.0;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The monthly spending limit that the budget status is measured against.
    pub budget_limit: f64,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The in-memory bill splitting session.
    pub split_session: Arc<Mutex<SplitSession>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        budget_limit: f64,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            budget_limit,
            db_connection: connection,
            split_session: Arc::new(Mutex::new(SplitSession::default())),
        })
    }
}
