//! Transaction creation page and endpoint.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Form};
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    Error,
    account::active_account,
    auth::UserID,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::load_page_context,
    timezone::local_today,
    transaction::{
        TransactionState,
        core::create_transaction,
        form::{
            TransactionForm, TransactionFormOptions, TransactionFormTarget, form_error_response,
            transaction_form_view,
        },
    },
};

/// Render the page for recording a transaction in the active account.
///
/// The date defaults to today in the local timezone.
pub async fn get_new_transaction_page(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) =
        load_page_context(jar, user_id, endpoints::NEW_TRANSACTION_VIEW, &connection)?;
    let options = TransactionFormOptions::load(user_id, context.account.id, &connection)?;

    let form = transaction_form_view(
        TransactionFormTarget::Create(endpoints::TRANSACTIONS_API),
        &TransactionForm::new(today),
        &options,
        "",
    );
    let content = html! {
        (context.nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "New Transaction" }
            p class="mb-4 text-sm text-gray-500" { "In " (context.account.name) }
            (form)
        }
    };

    Ok((
        jar,
        base("New Transaction", &[currency_input_styles()], &content),
    )
        .into_response())
}

/// Handle transaction creation, redirecting to the transactions page on success.
///
/// If the transaction moved a goal, the redirect asks the page to say so.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let (jar, account) = match active_account(jar, user_id, &connection) {
        Ok(active) => active,
        Err(error) => {
            tracing::error!("could not get the active account for user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    let data = match form.data().validate() {
        Ok(data) => data,
        Err(error) => {
            let response = form_error_response(
                TransactionFormTarget::Create(endpoints::TRANSACTIONS_API),
                &form,
                &error,
                user_id,
                account.id,
                &connection,
            );
            return (jar, response).into_response();
        }
    };

    match create_transaction(user_id, account.id, &data, &form.links(), &connection) {
        Ok(created) => {
            tracing::info!(
                "user {user_id} created transaction {}",
                created.transaction.id
            );
            let redirect_url = if created.goal_updated {
                format!("{}?goal_updated=true", endpoints::TRANSACTIONS_VIEW)
            } else {
                endpoints::TRANSACTIONS_VIEW.to_owned()
            };

            (jar, HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
        }
        Err(
            error @ (Error::InvalidAccount
            | Error::InvalidCategory
            | Error::InvalidBudgetItem
            | Error::InvalidGoal),
        ) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");
            error.into_alert_response()
        }
    }
}
