//! Defines the core data models for expenses.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The fixed set of categories an expense can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Bills,
    Shopping,
    Entertainment,
    Healthcare,
    Other,
}

impl Category {
    /// Every category in the order they are offered to the user.
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Shopping,
        Category::Entertainment,
        Category::Healthcare,
        Category::Other,
    ];

    /// The name shown to the user, e.g. "Food".
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Other => "Other",
        }
    }

    /// The lowercase name used in forms and persisted data, e.g. "food".
    pub fn slug(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Bills => "bills",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Healthcare => "healthcare",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        Category::ALL
            .into_iter()
            .find(|category| category.slug().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::InvalidCategory(name.to_owned()))
    }
}

/// Identifies an expense.
///
/// IDs are derived from the creation time in milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create an ID from `created_at` that is not used by any of `existing`.
    ///
    /// If two expenses are created within the same millisecond, the later one
    /// is bumped forward until its ID is unique.
    pub fn new_unique(created_at: OffsetDateTime, existing: &[Expense]) -> Self {
        let mut millis = created_at.unix_timestamp_nanos() / 1_000_000;

        loop {
            let candidate = Self(millis.to_string());

            if !existing.iter().any(|expense| expense.id == candidate) {
                return candidate;
            }

            millis += 1;
        }
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money that was spent on something.
///
/// Expenses are never edited once created, only deleted.
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount of money spent, always greater than zero.
    pub amount: f64,
    /// What kind of thing the money was spent on.
    pub category: Category,
    /// A short description of what the expense was for.
    pub description: String,
    /// When the money was spent.
    pub date: Date,
    /// Any extra details about the expense.
    #[serde(default)]
    pub notes: String,
    /// When the expense was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(amount: f64, category: Category, description: &str, date: Date) -> ExpenseBuilder {
        ExpenseBuilder {
            amount,
            category,
            description: description.to_owned(),
            date,
            notes: String::new(),
        }
    }
}

/// A builder for creating [Expense] instances.
///
/// Call `finalize()` to validate the fields and create the actual [Expense].
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseBuilder {
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: Date,
    pub notes: String,
}

impl ExpenseBuilder {
    /// Set the notes for the expense.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }

    /// Validate the builder and create an [Expense] recorded at `timestamp`.
    ///
    /// The new expense's ID is chosen so that it does not clash with any of `existing`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is not a finite number greater than zero,
    /// - or [Error::MissingField] if the description is empty.
    pub fn finalize(self, timestamp: OffsetDateTime, existing: &[Expense]) -> Result<Expense, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::MissingField("description"));
        }

        Ok(Expense {
            id: ExpenseId::new_unique(timestamp, existing),
            amount: self.amount,
            category: self.category,
            description: description.to_owned(),
            date: self.date,
            notes: self.notes.trim().to_owned(),
            timestamp,
        })
    }
}
