//! The route handlers that change the bill splitting session.
//!
//! Each handler applies one change to the session and responds with the
//! re-rendered split panel. Validation errors leave the session untouched and
//! respond with an alert instead.

use std::sync::{Mutex, MutexGuard};

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::html;
use serde::Deserialize;

use crate::{Error, alert::Alert};

use super::{
    page::{SplitState, split_panel_view},
    session::{ParticipantId, SplitSession},
};

/// The form data for adding a participant.
#[derive(Debug, Deserialize)]
pub struct ParticipantForm {
    /// The participant's display name.
    #[serde(default)]
    pub name: String,
}

/// The form data for setting the total bill.
#[derive(Debug, Deserialize)]
pub struct TotalBillForm {
    /// The bill amount in dollars, empty clears the amount.
    pub total_bill: Option<f64>,
}

/// The form data for a payer or splitter checkbox.
///
/// Browsers leave unchecked checkboxes out of the form, so a missing field
/// means the box was unchecked.
#[derive(Debug, Deserialize)]
pub struct SelectionForm {
    #[serde(default)]
    pub selected: bool,
}

/// The form data for the amount a payer paid.
#[derive(Debug, Deserialize)]
pub struct PaidAmountForm {
    /// The amount in dollars, empty clears the amount.
    pub amount: Option<f64>,
}

fn lock_session(session: &Mutex<SplitSession>) -> Result<MutexGuard<'_, SplitSession>, Error> {
    session.lock().map_err(|error| {
        tracing::error!("could not acquire the bill splitter lock: {error}");
        Error::SessionLockError
    })
}

/// Lock the session, apply `update` and render the result.
///
/// On success the response is the updated split panel, followed by the alert
/// returned by `update` if there is one.
fn update_session<F>(state: &SplitState, update: F) -> Response
where
    F: FnOnce(&mut SplitSession) -> Result<Option<Alert>, Error>,
{
    let mut session = match lock_session(&state.split_session) {
        Ok(session) => session,
        Err(error) => return error.into_alert_response(),
    };

    match update(&mut session) {
        Ok(alert) => html! {
            (split_panel_view(&session))

            @if let Some(alert) = alert {
                (alert.into_html())
            }
        }
        .into_response(),
        Err(error) => {
            tracing::debug!("rejected bill splitter update: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for adding a participant to the bill splitter.
pub async fn add_participant_endpoint(
    State(state): State<SplitState>,
    Form(form): Form<ParticipantForm>,
) -> Response {
    update_session(&state, |session| {
        let participant = session.add_participant(&form.name)?;

        Ok(Some(Alert::SuccessSimple {
            message: format!("{} added!", participant.name),
        }))
    })
}

/// A route handler for removing a participant and their selections.
pub async fn remove_participant_endpoint(
    State(state): State<SplitState>,
    Path(participant_id): Path<ParticipantId>,
) -> Response {
    update_session(&state, |session| {
        session.remove_participant(participant_id)?;

        Ok(None)
    })
}

/// A route handler for setting the total bill amount.
pub async fn set_total_bill_endpoint(
    State(state): State<SplitState>,
    Form(form): Form<TotalBillForm>,
) -> Response {
    update_session(&state, |session| {
        session.set_total_bill(form.total_bill)?;

        Ok(None)
    })
}

/// A route handler for marking or unmarking a participant as a payer.
pub async fn set_payer_endpoint(
    State(state): State<SplitState>,
    Path(participant_id): Path<ParticipantId>,
    Form(form): Form<SelectionForm>,
) -> Response {
    update_session(&state, |session| {
        session.set_payer(participant_id, form.selected)?;

        Ok(None)
    })
}

/// A route handler for setting the amount a payer paid.
pub async fn set_paid_amount_endpoint(
    State(state): State<SplitState>,
    Path(participant_id): Path<ParticipantId>,
    Form(form): Form<PaidAmountForm>,
) -> Response {
    update_session(&state, |session| {
        session.set_paid_amount(participant_id, form.amount)?;

        Ok(None)
    })
}

/// A route handler for marking or unmarking a participant as sharing the bill.
pub async fn set_splitter_endpoint(
    State(state): State<SplitState>,
    Path(participant_id): Path<ParticipantId>,
    Form(form): Form<SelectionForm>,
) -> Response {
    update_session(&state, |session| {
        session.set_splitter(participant_id, form.selected)?;

        Ok(None)
    })
}

/// A route handler for working out who owes whom.
pub async fn calculate_split_endpoint(State(state): State<SplitState>) -> Response {
    update_session(&state, |session| {
        let settlement = session.calculate()?;
        tracing::info!(
            "calculated bill split with {} payment(s)",
            settlement.payments.len()
        );

        Ok(Some(Alert::SuccessSimple {
            message: "Bill split calculated!".to_owned(),
        }))
    })
}

/// A route handler for clearing the bill splitter.
pub async fn reset_split_endpoint(State(state): State<SplitState>) -> Response {
    update_session(&state, |session| {
        session.reset();

        Ok(None)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use scraper::Selector;

    use crate::{
        split::{
            page::SplitState,
            session::{ParticipantId, SplitSession},
        },
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    use super::{
        PaidAmountForm, ParticipantForm, SelectionForm, TotalBillForm, add_participant_endpoint,
        calculate_split_endpoint, remove_participant_endpoint, reset_split_endpoint,
        set_paid_amount_endpoint, set_payer_endpoint, set_splitter_endpoint,
        set_total_bill_endpoint,
    };

    fn get_test_state() -> SplitState {
        SplitState {
            split_session: Arc::new(Mutex::new(SplitSession::default())),
        }
    }

    async fn add(state: &SplitState, name: &str) -> ParticipantId {
        add_participant_endpoint(
            State(state.clone()),
            Form(ParticipantForm {
                name: name.to_owned(),
            }),
        )
        .await;

        let session = state.split_session.lock().unwrap();
        session
            .participants()
            .last()
            .expect("participant should have been added")
            .id
    }

    async fn select(state: &SplitState, id: ParticipantId, payer: bool) {
        let form = Form(SelectionForm { selected: true });
        if payer {
            set_payer_endpoint(State(state.clone()), Path(id), form).await;
        } else {
            set_splitter_endpoint(State(state.clone()), Path(id), form).await;
        }
    }

    #[tokio::test]
    async fn add_participant_renders_panel_and_alert() {
        let state = get_test_state();

        let response = add_participant_endpoint(
            State(state.clone()),
            Form(ParticipantForm {
                name: "Alice".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_eq!(
            html.select(&Selector::parse("#split-panel #participants li").unwrap())
                .count(),
            1
        );
        let alert = html
            .select(&Selector::parse("#alert-container p").unwrap())
            .next()
            .expect("response should contain a success alert");
        assert_eq!(alert.text().collect::<String>(), "Alice added!");
    }

    #[tokio::test]
    async fn add_participant_rejects_empty_name() {
        let state = get_test_state();

        let response = add_participant_endpoint(
            State(state.clone()),
            Form(ParticipantForm {
                name: " ".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.split_session.lock().unwrap().participants().is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_participant_is_not_found() {
        let state = get_test_state();

        let response =
            remove_participant_endpoint(State(state), Path(ParticipantId::new(42))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unchecking_payer_clears_amount() {
        let state = get_test_state();
        let alice = add(&state, "Alice").await;
        select(&state, alice, true).await;
        set_paid_amount_endpoint(
            State(state.clone()),
            Path(alice),
            Form(PaidAmountForm { amount: Some(10.0) }),
        )
        .await;

        let response = set_payer_endpoint(
            State(state.clone()),
            Path(alice),
            Form(SelectionForm { selected: false }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let session = state.split_session.lock().unwrap();
        assert!(!session.is_payer(alice));
        assert_eq!(session.paid_amount(alice), None);
    }

    #[tokio::test]
    async fn paid_amount_for_non_payer_is_rejected() {
        let state = get_test_state();
        let alice = add(&state, "Alice").await;

        let response = set_paid_amount_endpoint(
            State(state.clone()),
            Path(alice),
            Form(PaidAmountForm { amount: Some(10.0) }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.split_session.lock().unwrap().paid_amount(alice), None);
    }

    #[tokio::test]
    async fn negative_bill_is_rejected() {
        let state = get_test_state();

        let response = set_total_bill_endpoint(
            State(state.clone()),
            Form(TotalBillForm {
                total_bill: Some(-3.0),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.split_session.lock().unwrap().total_bill(), None);
    }

    #[tokio::test]
    async fn calculate_shows_payments() {
        let state = get_test_state();
        let alice = add(&state, "Alice").await;
        let bob = add(&state, "Bob").await;
        let carol = add(&state, "Carol").await;
        set_total_bill_endpoint(
            State(state.clone()),
            Form(TotalBillForm {
                total_bill: Some(50.0),
            }),
        )
        .await;
        for (id, amount) in [(alice, 30.0), (carol, 20.0)] {
            select(&state, id, true).await;
            set_paid_amount_endpoint(
                State(state.clone()),
                Path(id),
                Form(PaidAmountForm {
                    amount: Some(amount),
                }),
            )
            .await;
        }
        for id in [alice, bob, carol] {
            select(&state, id, false).await;
        }

        let response = calculate_split_endpoint(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let payments = html
            .select(&Selector::parse("#payments li").unwrap())
            .map(|li| {
                li.text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>();
        assert_eq!(
            payments,
            vec!["Bob pays Alice $13.33", "Bob pays Carol $3.33"]
        );
    }

    #[tokio::test]
    async fn calculate_with_mismatched_totals_is_rejected() {
        let state = get_test_state();
        let alice = add(&state, "Alice").await;
        set_total_bill_endpoint(
            State(state.clone()),
            Form(TotalBillForm {
                total_bill: Some(50.0),
            }),
        )
        .await;
        select(&state, alice, true).await;
        select(&state, alice, false).await;
        set_paid_amount_endpoint(
            State(state.clone()),
            Path(alice),
            Form(PaidAmountForm { amount: Some(40.0) }),
        )
        .await;

        let response = calculate_split_endpoint(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("Total paid ($40.00) doesn't match bill amount ($50.00)"),
            "got alert text {text:?}"
        );
        assert_eq!(state.split_session.lock().unwrap().settlement(), None);
    }

    #[tokio::test]
    async fn reset_clears_session() {
        let state = get_test_state();
        add(&state, "Alice").await;

        let response = reset_split_endpoint(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*state.split_session.lock().unwrap(), SplitSession::default());
    }

    #[tokio::test]
    async fn poisoned_session_lock_is_an_internal_error() {
        let state = get_test_state();
        let poisoned = state.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoned.split_session.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let response = reset_split_endpoint(State(state)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
