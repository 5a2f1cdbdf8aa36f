//! Renders the expense ledger page: summary cards, the list of expenses, the
//! form for adding an expense and the category chart.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, CATEGORY_BADGE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base_with_alert,
        dollar_input_styles, format_currency,
    },
    navigation::NavBar,
    timezone::local_now,
};

use super::{
    charts::{category_chart, category_chart_script, category_chart_view},
    core::{Category, Expense},
    store::{get_expenses, get_initial_balance},
    summary::LedgerSummary,
};

/// The state needed for the expense ledger.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The monthly spending limit.
    pub budget_limit: f64,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            budget_limit: state.budget_limit,
        }
    }
}

/// A success message shown once on the ledger page after a change redirects back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ExpenseAdded,
    ExpenseDeleted,
    BalanceSaved,
}

impl Notice {
    const ALL: [Notice; 3] = [
        Notice::ExpenseAdded,
        Notice::ExpenseDeleted,
        Notice::BalanceSaved,
    ];

    fn slug(self) -> &'static str {
        match self {
            Notice::ExpenseAdded => "expense_added",
            Notice::ExpenseDeleted => "expense_deleted",
            Notice::BalanceSaved => "balance_saved",
        }
    }

    fn from_slug(slug: &str) -> Option<Self> {
        Notice::ALL.into_iter().find(|notice| notice.slug() == slug)
    }

    fn into_alert(self) -> Alert {
        let message = match self {
            Notice::ExpenseAdded => "Expense added successfully!",
            Notice::ExpenseDeleted => "Expense deleted",
            Notice::BalanceSaved => "Initial balance saved",
        };

        Alert::SuccessSimple {
            message: message.to_owned(),
        }
    }

    /// The ledger page URL that shows this notice.
    pub fn redirect_url(self) -> String {
        format!("{}?notice={}", endpoints::EXPENSES_VIEW, self.slug())
    }
}

/// The query parameters for the ledger page.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    /// The notice to show, unknown values are ignored.
    pub notice: Option<String>,
}

/// Renders the expense ledger page.
pub async fn get_expenses_page(
    State(state): State<ExpenseState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Response, Error> {
    let now = local_now(&state.local_timezone)?;

    let (expenses, initial_balance) = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        (
            get_expenses(&connection)?,
            get_initial_balance(&connection)?,
        )
    };

    let summary = LedgerSummary::new(&expenses, initial_balance, state.budget_limit);

    let alert = query
        .notice
        .as_deref()
        .and_then(Notice::from_slug)
        .map(Notice::into_alert);

    Ok(expenses_view(&expenses, initial_balance, &summary, now, alert).into_response())
}

fn expenses_view(
    expenses: &[Expense],
    initial_balance: f64,
    summary: &LedgerSummary,
    now: OffsetDateTime,
    alert: Option<Alert>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let has_chart = !summary.category_totals.is_empty();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full space-y-6 pb-24 lg:pb-0"
            {
                (summary_cards(summary))

                div class="grid grid-cols-1 lg:grid-cols-3 gap-6"
                {
                    div class="lg:col-span-2 space-y-6"
                    {
                        (expense_list(expenses, now))

                        @if has_chart {
                            section class=(CARD_STYLE) { (category_chart_view()) }
                        }
                    }

                    div class="space-y-6"
                    {
                        (add_expense_form(now))
                        (initial_balance_form(initial_balance))
                    }
                }
            }
        }
    };

    let mut head_elements = vec![dollar_input_styles()];
    if has_chart {
        head_elements.push(HeadElement::ScriptLink(
            "/static/echarts.6.0.0.min.js".to_owned(),
        ));
        head_elements.push(category_chart_script(&category_chart(
            &summary.category_totals,
        )));
    }

    base_with_alert("Expenses", &head_elements, &content, alert)
}

fn stat_card(title: &str, value: &str, subtitle: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (title) }
            p class="stat-value text-2xl font-bold mt-1" { (value) }
            p class="text-sm text-gray-500 dark:text-gray-400 mt-1" { (subtitle) }
        }
    }
}

fn summary_cards(summary: &LedgerSummary) -> Markup {
    let category_subtitle = match summary.category_count() {
        1 => "1 category".to_owned(),
        count => format!("{count} categories"),
    };
    let top_category_subtitle = match summary.top_category {
        Some((category, total)) => format!("Top: {} ({})", category, format_currency(total)),
        None => "No spending yet".to_owned(),
    };

    html! {
        section id="summary" class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4"
        {
            (stat_card(
                "Current Balance",
                &format_currency(summary.current_balance),
                "Initial balance minus expenses",
            ))
            (stat_card(
                "Monthly Expenses",
                &format_currency(summary.monthly_expenses),
                &top_category_subtitle,
            ))
            (stat_card(
                "Transactions",
                &summary.transaction_count.to_string(),
                &category_subtitle,
            ))
            (stat_card(
                "Budget Status",
                &format!("{}%", summary.budget.percentage),
                &format!(
                    "{} remaining of {}",
                    format_currency(summary.budget.remaining),
                    format_currency(summary.budget.limit)
                ),
            ))
        }
    }
}

fn expense_list(expenses: &[Expense], now: OffsetDateTime) -> Markup {
    html! {
        section id="expenses" class=(CARD_STYLE)
        {
            h2 class="text-xl font-bold mb-6" { "Recent Transactions" }

            @if expenses.is_empty() {
                p class="text-center text-gray-500 dark:text-gray-400 py-8"
                {
                    "No transactions yet. Add your first expense!"
                }
            } @else {
                ul class="space-y-3"
                {
                    @for expense in expenses {
                        li
                            class="flex items-center justify-between gap-4 p-4 rounded-lg bg-gray-100 dark:bg-gray-700"
                        {
                            div class="min-w-0 space-y-1"
                            {
                                div class="flex items-center gap-2"
                                {
                                    span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
                                    span class="font-medium truncate" { (expense.description) }
                                }

                                p class="text-sm text-gray-500 dark:text-gray-400"
                                {
                                    (format_relative_time(expense.timestamp, now))
                                }

                                @if !expense.notes.is_empty() {
                                    p class="text-sm text-gray-500 dark:text-gray-400 italic" { (expense.notes) }
                                }
                            }

                            div class="flex items-center gap-4"
                            {
                                span class="font-bold whitespace-nowrap" { "-" (format_currency(expense.amount)) }

                                button
                                    type="button"
                                    hx-delete=(endpoints::format_endpoint(endpoints::DELETE_EXPENSE, &expense.id))
                                    hx-target-error="#alert-container"
                                    class=(BUTTON_DELETE_STYLE)
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn add_expense_form(now: OffsetDateTime) -> Markup {
    let today = now.date();

    html! {
        section class=(CARD_STYLE)
        {
            form
                id="add-expense-form"
                hx-post=(endpoints::EXPENSES_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                h2 class="text-xl font-bold" { "Add New Expense" }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    div class="input-wrapper w-full"
                    {
                        input
                            name="amount"
                            id="amount"
                            type="number"
                            step="0.01"
                            min="0.01"
                            placeholder="0.00"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    select
                        name="category"
                        id="category"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Select a category" }

                        @for category in Category::ALL {
                            option value=(category.slug()) { (category.label()) }
                        }
                    }
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="What was it for?"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        value=(today)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="notes" class=(FORM_LABEL_STYLE) { "Notes (optional)" }

                    textarea
                        name="notes"
                        id="notes"
                        rows="3"
                        placeholder="Add any extra details..."
                        class=(FORM_TEXT_INPUT_STYLE)
                    {}
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
            }
        }
    }
}

fn initial_balance_form(initial_balance: f64) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            form
                id="initial-balance-form"
                hx-put=(endpoints::INITIAL_BALANCE)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                h2 class="text-xl font-bold" { "Initial Balance" }

                div class="input-wrapper w-full"
                {
                    input
                        name="initial_balance"
                        id="initial_balance"
                        type="number"
                        step="0.01"
                        min="0"
                        value=(format!("{initial_balance:.2}"))
                        required
                        aria-label="Initial balance"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Balance" }
            }
        }
    }
}

const TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");
const SHORT_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none]");

/// Describe how long ago `timestamp` was relative to `now`, e.g. "5 mins ago".
///
/// Timestamps less than an hour old are shown in minutes, less than a day old
/// in hours, one day old as "Yesterday" with the time, and anything older as
/// the month and day. Times are shown in the offset of `now`.
pub fn format_relative_time(timestamp: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = now - timestamp;
    let minutes = elapsed.whole_minutes().max(0);
    let hours = elapsed.whole_hours().max(0);
    let days = elapsed.whole_days().max(0);
    let local_timestamp = timestamp.to_offset(now.offset());

    let plural = |count: i64| if count == 1 { "" } else { "s" };

    if minutes < 60 {
        format!("{minutes} min{} ago", plural(minutes))
    } else if hours < 24 {
        format!("{hours} hour{} ago", plural(hours))
    } else if days == 1 {
        format!(
            "Yesterday, {}",
            local_timestamp.format(TIME_FORMAT).unwrap_or_default()
        )
    } else {
        local_timestamp
            .format(SHORT_DATE_FORMAT)
            .unwrap_or_default()
    }
}
