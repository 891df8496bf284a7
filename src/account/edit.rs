//! Account editing page and endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Form};
use axum_htmx::HxRedirect;
use maud::html;
use uuid::Uuid;

use crate::{
    Error,
    account::{
        create::AccountState,
        form::{AccountForm, AccountFormTarget, account_form_view},
        get_account, update_account,
    },
    auth::UserID,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::load_page_context,
};

/// Render the page for editing account `account_id`.
pub async fn get_edit_account_page(
    Path(account_id): Path<Uuid>,
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(user_id, account_id, &connection)?;
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::ACCOUNT, account_id);
    let (jar, context) = load_page_context(jar, user_id, &edit_endpoint, &connection)?;

    let form = account_form_view(
        AccountFormTarget::Update(&update_endpoint),
        &AccountForm::from(&account),
        "",
    );
    let content = html! {
        (context.nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Edit Account" }
            (form)
        }
    };

    Ok((
        jar,
        base("Edit Account", &[currency_input_styles()], &content),
    )
        .into_response())
}

/// Handle account update form submission, redirecting to the settings page on success.
pub async fn update_account_endpoint(
    Path(account_id): Path<Uuid>,
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<AccountForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::ACCOUNT, account_id);

    let data = match form.clone().into_data().validate() {
        Ok(data) => data,
        Err(error) => {
            return account_form_view(
                AccountFormTarget::Update(&update_endpoint),
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

    match update_account(user_id, account_id, &data, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingAccount) => Error::UpdateMissingAccount.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating account {account_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
