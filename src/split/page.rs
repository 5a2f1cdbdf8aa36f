//! Renders the bill splitter page and the panel that is swapped in after each change.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE,
        FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        dollar_input_styles, format_currency,
    },
    navigation::NavBar,
};

use super::{
    session::{Participant, SplitSession},
    settlement::Settlement,
};

/// The state needed for the bill splitter.
#[derive(Debug, Clone)]
pub struct SplitState {
    /// The bill splitting session shared between requests.
    pub split_session: Arc<Mutex<SplitSession>>,
}

impl FromRef<AppState> for SplitState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            split_session: state.split_session.clone(),
        }
    }
}

/// The ID of the element that every bill splitter endpoint replaces.
pub const SPLIT_PANEL_ID: &str = "split-panel";

/// Renders the bill splitter page.
pub async fn get_split_page(State(state): State<SplitState>) -> Result<Response, Error> {
    let session = state.split_session.lock().map_err(|error| {
        tracing::error!("could not acquire the bill splitter lock: {error}");
        Error::SessionLockError
    })?;

    let nav_bar = NavBar::new(endpoints::SPLIT_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl pb-24 lg:pb-0"
            {
                (split_panel_view(&session))
            }
        }
    };

    Ok(base("Bill Splitter", &[dollar_input_styles()], &content).into_response())
}

/// The bill splitter card: participants, bill amount, payers, splitters and results.
pub fn split_panel_view(session: &SplitSession) -> Markup {
    let participants = session.participants();

    html! {
        section
            id=(SPLIT_PANEL_ID)
            class=(CARD_STYLE)
            hx-target={"#" (SPLIT_PANEL_ID)}
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            h2 class="text-xl font-bold mb-6" { "Bill Splitter" }

            div class="space-y-6"
            {
                (add_participant_form())

                @if !participants.is_empty() {
                    (participant_list(participants))
                    (total_bill_input(session.total_bill()))
                    (payers_view(session))
                    (splitters_view(session))

                    div class="flex gap-2"
                    {
                        button
                            type="button"
                            hx-post=(endpoints::CALCULATE_SPLIT)
                            class=(BUTTON_PRIMARY_STYLE)
                        {
                            "Calculate Split"
                        }

                        button
                            type="button"
                            hx-post=(endpoints::RESET_SPLIT)
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Reset"
                        }
                    }

                    @if let Some(settlement) = session.settlement() {
                        (settlement_view(&settlement))
                    }
                }
            }
        }
    }
}

fn add_participant_form() -> Markup {
    html! {
        form hx-post=(endpoints::PARTICIPANTS)
        {
            label for="participant-name" class=(FORM_LABEL_STYLE) { "Add Participants" }

            div class="flex gap-2"
            {
                input
                    id="participant-name"
                    name="name"
                    type="text"
                    placeholder="Enter name"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                button type="submit" class="px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded"
                {
                    "Add"
                }
            }
        }
    }
}

fn participant_list(participants: &[Participant]) -> Markup {
    html! {
        ul id="participants" class="space-y-3"
        {
            @for participant in participants {
                li
                    class="flex items-center justify-between p-3 rounded-lg bg-gray-100 dark:bg-gray-700"
                {
                    span class="font-medium" { (participant.name) }

                    button
                        type="button"
                        hx-delete=(endpoints::format_endpoint(endpoints::DELETE_PARTICIPANT, participant.id))
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Remove"
                    }
                }
            }
        }
    }
}

fn total_bill_input(total_bill: Option<f64>) -> Markup {
    html! {
        div
        {
            label for="total_bill" class=(FORM_LABEL_STYLE) { "Total Bill Amount" }

            div class="input-wrapper w-full"
            {
                input
                    id="total_bill"
                    name="total_bill"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=[total_bill]
                    hx-put=(endpoints::TOTAL_BILL)
                    hx-trigger="change"
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

fn payers_view(session: &SplitSession) -> Markup {
    html! {
        fieldset id="payers"
        {
            legend class=(FORM_LABEL_STYLE) { "Who Paid? (Enter amounts)" }

            div class="space-y-2"
            {
                @for participant in session.participants() {
                    @let is_payer = session.is_payer(participant.id);

                    div class="flex items-center gap-3"
                    {
                        input
                            type="checkbox"
                            name="selected"
                            value="true"
                            checked[is_payer]
                            aria-label={"Paid: " (participant.name)}
                            hx-put=(endpoints::format_endpoint(endpoints::PAYER, participant.id))
                            hx-trigger="change"
                            class=(FORM_CHECKBOX_STYLE);

                        span class="flex-1" { (participant.name) }

                        @if is_payer {
                            div class="input-wrapper w-32"
                            {
                                input
                                    type="number"
                                    name="amount"
                                    step="0.01"
                                    min="0"
                                    placeholder="0.00"
                                    aria-label={"Amount paid by " (participant.name)}
                                    value=[session.paid_amount(participant.id)]
                                    hx-put=(endpoints::format_endpoint(endpoints::PAID_AMOUNT, participant.id))
                                    hx-trigger="change"
                                    class=(FORM_TEXT_INPUT_STYLE);
                            }
                        }
                    }
                }
            }
        }
    }
}

fn splitters_view(session: &SplitSession) -> Markup {
    html! {
        fieldset id="splitters"
        {
            legend class=(FORM_LABEL_STYLE) { "Split Between" }

            div class="space-y-2"
            {
                @for participant in session.participants() {
                    label class="flex items-center gap-3"
                    {
                        input
                            type="checkbox"
                            name="selected"
                            value="true"
                            checked[session.is_splitter(participant.id)]
                            hx-put=(endpoints::format_endpoint(endpoints::SPLITTER, participant.id))
                            hx-trigger="change"
                            class=(FORM_CHECKBOX_STYLE);

                        span { (participant.name) }
                    }
                }
            }
        }
    }
}

fn settlement_view(settlement: &Settlement) -> Markup {
    html! {
        div id="settlement" class="space-y-4 p-4 rounded-lg bg-gray-100 dark:bg-gray-700"
        {
            h3 class="font-bold text-lg" { "Settlement Details" }

            @if settlement.is_settled() {
                p class="text-center text-gray-500 dark:text-gray-400" { "Everyone is settled up!" }
            }

            @if !settlement.creditors.is_empty() {
                div id="creditors"
                {
                    p class="text-sm font-semibold mb-2 text-green-700 dark:text-green-400" { "Should Receive:" }

                    @for creditor in &settlement.creditors {
                        p class="ml-4"
                        {
                            (creditor.name) " should receive "
                            span class="font-bold text-green-700 dark:text-green-400"
                            {
                                (format_currency(creditor.amount))
                            }
                        }
                    }
                }
            }

            @if !settlement.debtors.is_empty() {
                div id="debtors"
                {
                    p class="text-sm font-semibold mb-2 text-red-700 dark:text-red-400" { "Needs to Pay:" }

                    @for debtor in &settlement.debtors {
                        p class="ml-4"
                        {
                            (debtor.name) " needs to pay "
                            span class="font-bold text-red-700 dark:text-red-400"
                            {
                                (format_currency(debtor.amount))
                            }
                        }
                    }
                }
            }

            @if !settlement.payments.is_empty() {
                div id="payments"
                {
                    p class="text-sm font-semibold mb-2" { "Payments:" }

                    ol class="ml-4 space-y-1"
                    {
                        @for payment in &settlement.payments {
                            li
                            {
                                (payment.from) " pays " (payment.to) " "
                                span class="font-bold" { (format_currency(payment.amount)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use scraper::{Html, Selector};

    use crate::{
        split::{
            page::{SplitState, get_split_page, split_panel_view},
            session::SplitSession,
        },
        test_utils::{assert_content_type, assert_status_ok, assert_valid_html, parse_html_document},
    };

    fn render(session: &SplitSession) -> Html {
        Html::parse_fragment(&split_panel_view(session).into_string())
    }

    fn texts(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| {
                element
                    .text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    #[tokio::test]
    async fn page_renders_empty_splitter() {
        let state = SplitState {
            split_session: Arc::new(Mutex::new(SplitSession::default())),
        };

        let response = get_split_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            html.select(&Selector::parse("#split-panel form").unwrap())
                .count(),
            1
        );
    }

    #[test]
    fn empty_session_only_shows_add_form() {
        let html = render(&SplitSession::default());

        assert_valid_html(&html);
        assert!(texts(&html, "#participants").is_empty());
        assert!(texts(&html, "#payers").is_empty());
        assert!(texts(&html, "#settlement").is_empty());
    }

    #[test]
    fn payer_amount_input_only_shown_for_payers() {
        let mut session = SplitSession::default();
        let a = session.add_participant("A").unwrap().id;
        session.add_participant("B").unwrap();
        session.set_payer(a, true).unwrap();

        let html = render(&session);

        let amount_inputs = html
            .select(&Selector::parse("#payers input[name=amount]").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(amount_inputs.len(), 1);
        assert_eq!(
            amount_inputs[0].value().attr("hx-put"),
            Some(format!("/api/split/payers/{a}/amount").as_str())
        );
        let checked = html
            .select(&Selector::parse("#payers input[type=checkbox][checked]").unwrap())
            .count();
        assert_eq!(checked, 1);
    }

    #[test]
    fn shows_settlement_after_calculation() {
        let mut session = SplitSession::default();
        let a = session.add_participant("Alice").unwrap().id;
        let b = session.add_participant("Bob").unwrap().id;
        session.set_total_bill(Some(40.0)).unwrap();
        session.set_payer(a, true).unwrap();
        session.set_paid_amount(a, Some(40.0)).unwrap();
        session.set_splitter(a, true).unwrap();
        session.set_splitter(b, true).unwrap();
        session.calculate().unwrap();

        let html = render(&session);

        assert_valid_html(&html);
        assert_eq!(
            texts(&html, "#creditors p.ml-4"),
            vec!["Alice should receive $20.00"]
        );
        assert_eq!(texts(&html, "#debtors p.ml-4"), vec!["Bob needs to pay $20.00"]);
        assert_eq!(texts(&html, "#payments li"), vec!["Bob pays Alice $20.00"]);
    }

    #[test]
    fn shows_settled_message_when_no_one_owes() {
        let mut session = SplitSession::default();
        let a = session.add_participant("Alice").unwrap().id;
        session.set_total_bill(Some(10.0)).unwrap();
        session.set_payer(a, true).unwrap();
        session.set_paid_amount(a, Some(10.0)).unwrap();
        session.set_splitter(a, true).unwrap();
        session.calculate().unwrap();

        let html = render(&session);

        assert_eq!(
            texts(&html, "#settlement p"),
            vec!["Everyone is settled up!"]
        );
    }

    #[test]
    fn creditors_are_shown_even_without_debtors() {
        let mut session = SplitSession::default();
        let ids = ["A", "B", "C", "D"].map(|name| session.add_participant(name).unwrap().id);
        session.set_total_bill(Some(0.04)).unwrap();
        session.set_payer(ids[0], true).unwrap();
        session.set_paid_amount(ids[0], Some(0.04)).unwrap();
        for id in ids {
            session.set_splitter(id, true).unwrap();
        }
        session.calculate().unwrap();

        let html = render(&session);

        assert_valid_html(&html);
        assert_eq!(texts(&html, "#creditors p.ml-4"), vec!["A should receive $0.03"]);
        assert!(texts(&html, "#debtors p.ml-4").is_empty());
        assert!(
            !texts(&html, "#settlement p").contains(&"Everyone is settled up!".to_owned()),
            "a participant is still owed money"
        );
    }
}
