//! The inline form for recording how much has been saved towards a goal.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    Error,
    auth::UserID,
    endpoints,
    goal::{GoalState, update_goal_progress},
    html::{BUTTON_SECONDARY_STYLE, FORM_ERROR_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The amount is kept as text and parsed by [update_goal_progress_endpoint].
#[derive(Debug, Deserialize)]
pub struct GoalProgressForm {
    pub current_amount: String,
}

pub fn progress_form_view(goal_id: Uuid, current_amount: &str, error_message: &str) -> Markup {
    let endpoint = endpoints::format_endpoint(endpoints::GOAL_PROGRESS, goal_id);
    let input_id = format!("current-amount-{goal_id}");

    html! {
        form
            hx-put=(endpoint)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="flex flex-wrap items-center gap-2"
        {
            label for=(input_id) class="sr-only" { "Saved so far" }

            div class="input-wrapper"
            {
                input
                    id=(input_id)
                    type="number"
                    name="current_amount"
                    step="0.01"
                    min="0"
                    value=(current_amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Update" }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

/// Set the current amount of a goal, redirecting to the goals page on success.
pub async fn update_goal_progress_endpoint(
    Path(goal_id): Path<Uuid>,
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<GoalProgressForm>,
) -> Response {
    let current_amount = match form.current_amount.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => {
            return progress_form_view(
                goal_id,
                &form.current_amount,
                &Error::InvalidAmount.to_string(),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_goal_progress(user_id, goal_id, current_amount, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingGoal) => Error::UpdateMissingGoal.into_alert_response(),
        Err(error) => {
            tracing::error!("could not update progress of goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod update_goal_progress_endpoint_tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use uuid::Uuid;

    use crate::{
        endpoints,
        goal::{GoalData, GoalPeriod, GoalState, create_goal, get_goal},
        test_utils::{
            assert_form_error_message, assert_hx_redirect, get_test_db_with_account,
            must_get_form, parse_html_fragment,
        },
    };

    use super::{GoalProgressForm, update_goal_progress_endpoint};

    fn setup() -> (GoalState, crate::auth::UserID, Uuid) {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let goal = create_goal(
            user_id,
            account.id,
            &GoalData {
                name: "Bike".to_owned(),
                target_amount: 800.0,
                current_amount: 100.0,
                period: GoalPeriod::OneOff,
                deadline: None,
            },
            &db_connection.lock().unwrap(),
        )
        .unwrap();

        (GoalState::new(db_connection), user_id, goal.id)
    }

    fn form(current_amount: &str) -> Form<GoalProgressForm> {
        Form(GoalProgressForm {
            current_amount: current_amount.to_owned(),
        })
    }

    #[tokio::test]
    async fn sets_current_amount() {
        let (state, user_id, goal_id) = setup();

        let response = update_goal_progress_endpoint(
            Path(goal_id),
            State(state.clone()),
            Extension(user_id),
            form("450.50"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::GOALS_VIEW);
        let goal = get_goal(user_id, goal_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(goal.current_amount, 450.5);
    }

    #[tokio::test]
    async fn rejects_negative_and_non_numeric_amounts() {
        let (state, user_id, goal_id) = setup();

        for bad_amount in ["-1", "abc", ""] {
            let response = update_goal_progress_endpoint(
                Path(goal_id),
                State(state.clone()),
                Extension(user_id),
                form(bad_amount),
            )
            .await;

            assert_eq!(response.status(), StatusCode::OK);
            let html = parse_html_fragment(response).await;
            assert_form_error_message(&must_get_form(&html), "Invalid amount");
        }

        let goal = get_goal(user_id, goal_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(goal.current_amount, 100.0);
    }
}
