//! The form and endpoint for setting the active account's initial balance.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Form};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    account::{active_account, set_initial_balance},
    auth::UserID,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    settings::SettingsState,
};

#[derive(Debug, Deserialize)]
pub struct InitialBalanceForm {
    pub initial_balance: f64,
}

pub fn initial_balance_form_view(initial_balance: f64, error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::INITIAL_BALANCE)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            div
            {
                label for="initial_balance" class=(FORM_LABEL_STYLE) { "Initial balance" }

                div class="input-wrapper w-full"
                {
                    input
                        id="initial_balance"
                        type="number"
                        name="initial_balance"
                        step="0.01"
                        value=(initial_balance)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
        }
    }
}

/// Set the initial balance of the active account.
pub async fn update_initial_balance_endpoint(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
    Form(form): Form<InitialBalanceForm>,
) -> Response {
    if !form.initial_balance.is_finite() {
        let error = Error::NonFiniteAmount("Initial balance");
        return initial_balance_form_view(0.0, &format!("Error: {error}")).into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = active_account(jar, user_id, &connection).and_then(|(jar, account)| {
        set_initial_balance(user_id, account.id, form.initial_balance, &connection)?;
        Ok(jar)
    });

    match result {
        Ok(jar) => (
            jar,
            HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set initial balance for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod update_initial_balance_endpoint_tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::{CookieJar, Form, cookie::Cookie};

    use crate::{
        account::{ACTIVE_ACCOUNT_COOKIE, get_account},
        endpoints,
        settings::SettingsState,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, get_test_db_with_account,
            must_get_form, parse_html_fragment,
        },
    };

    use super::{InitialBalanceForm, update_initial_balance_endpoint};

    #[tokio::test]
    async fn sets_initial_balance_of_active_account() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let state = SettingsState { db_connection };
        let jar = CookieJar::new().add(Cookie::new(ACTIVE_ACCOUNT_COOKIE, account.id.to_string()));

        let response = update_initial_balance_endpoint(
            State(state.clone()),
            Extension(user_id),
            jar,
            Form(InitialBalanceForm {
                initial_balance: -120.5,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SETTINGS_VIEW);
        let got = get_account(user_id, account.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.initial_balance, -120.5);
    }

    #[tokio::test]
    async fn rejects_non_finite_balance() {
        let (db_connection, user_id, _) = get_test_db_with_account();

        let response = update_initial_balance_endpoint(
            State(SettingsState { db_connection }),
            Extension(user_id),
            CookieJar::new(),
            Form(InitialBalanceForm {
                initial_balance: f64::INFINITY,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(
            &must_get_form(&html),
            "Error: Initial balance must be a finite number",
        );
    }
}
