//! Account creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Form};
use axum_htmx::HxRedirect;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{
        create_account,
        form::{AccountForm, AccountFormTarget, account_form_view},
    },
    auth::UserID,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::load_page_context,
};

/// The state needed for the account pages and endpoints.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for creating an account.
pub async fn get_new_account_page(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) =
        load_page_context(jar, user_id, endpoints::NEW_ACCOUNT_VIEW, &connection)?;
    let form = account_form_view(
        AccountFormTarget::Create(endpoints::ACCOUNTS_API),
        &AccountForm::default(),
        "",
    );

    let content = html! {
        (context.nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "New Account" }
            (form)
        }
    };

    Ok((
        jar,
        base("New Account", &[currency_input_styles()], &content),
    )
        .into_response())
}

/// Handle account creation form submission, redirecting to the settings page on success.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<AccountForm>,
) -> Response {
    let data = match form.clone().into_data().validate() {
        Ok(data) => data,
        Err(error) => {
            return account_form_view(
                AccountFormTarget::Create(endpoints::ACCOUNTS_API),
                &form,
                &format!("Error: {error}"),
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

    match create_account(user_id, &data, &connection) {
        Ok(account) => {
            tracing::info!("user {user_id} created account {}", account.id);
            (
                HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an account: {error}");
            error.into_alert_response()
        }
    }
}
