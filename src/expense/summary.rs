//! Summary statistics derived from the expense ledger.
//!
//! Everything here is recomputed from the full list of expenses each time the
//! ledger page is rendered.

use super::core::{Category, Expense};

/// The total spent on all expenses.
///
/// The ledger is treated as the current month, so no expenses are filtered out.
pub fn monthly_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// The initial balance minus everything that has been spent.
pub fn current_balance(initial_balance: f64, expenses: &[Expense]) -> f64 {
    initial_balance - monthly_expenses(expenses)
}

/// The total spent in each category, in the order each category first appears.
pub fn category_totals(expenses: &[Expense]) -> Vec<(Category, f64)> {
    let mut totals: Vec<(Category, f64)> = Vec::new();

    for expense in expenses {
        match totals
            .iter_mut()
            .find(|(category, _)| *category == expense.category)
        {
            Some((_, total)) => *total += expense.amount,
            None => totals.push((expense.category, expense.amount)),
        }
    }

    totals
}

/// The category with the most spending, ties go to the category that appears first.
pub fn top_category(totals: &[(Category, f64)]) -> Option<(Category, f64)> {
    totals.iter().fold(None, |top, &(category, total)| match top {
        Some((_, top_total)) if top_total >= total => top,
        _ => Some((category, total)),
    })
}

/// How much of the budget has been used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// The spending limit.
    pub limit: f64,
    /// The percentage of the limit that has been spent, capped at 100.
    pub percentage: u32,
    /// How much can still be spent, never negative.
    pub remaining: f64,
}

/// Compare the amount spent against the budget `limit`.
///
/// A limit of zero or less counts as fully used as soon as anything is spent.
pub fn budget_status(spent: f64, limit: f64) -> BudgetStatus {
    let percentage = if limit <= 0.0 {
        if spent > 0.0 { 100 } else { 0 }
    } else {
        (spent / limit * 100.0).round().clamp(0.0, 100.0) as u32
    };

    BudgetStatus {
        limit,
        percentage,
        remaining: (limit - spent).max(0.0),
    }
}

/// The statistics shown at the top of the ledger page.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub current_balance: f64,
    pub monthly_expenses: f64,
    pub transaction_count: usize,
    pub category_totals: Vec<(Category, f64)>,
    pub top_category: Option<(Category, f64)>,
    pub budget: BudgetStatus,
}

impl LedgerSummary {
    /// Summarise `expenses` given the user's initial balance and budget limit.
    pub fn new(expenses: &[Expense], initial_balance: f64, budget_limit: f64) -> Self {
        let monthly_expenses = monthly_expenses(expenses);
        let category_totals = category_totals(expenses);
        let top_category = top_category(&category_totals);

        Self {
            current_balance: current_balance(initial_balance, expenses),
            monthly_expenses,
            transaction_count: expenses.len(),
            category_totals,
            top_category,
            budget: budget_status(monthly_expenses, budget_limit),
        }
    }

    /// The number of distinct categories that have been spent on.
    pub fn category_count(&self) -> usize {
        self.category_totals.len()
    }
}
