//! Transaction editing page and endpoint.

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
    auth::UserID,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::load_page_context,
    transaction::{
        TransactionState,
        core::{get_transaction, update_transaction},
        form::{
            TransactionForm, TransactionFormOptions, TransactionFormTarget, form_error_response,
            transaction_form_view,
        },
    },
};

/// Render the page for editing transaction `transaction_id`.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<Uuid>,
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(user_id, transaction_id, &connection)?;
    let edit_endpoint =
        endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::TRANSACTION, transaction_id);
    let (jar, context) = load_page_context(jar, user_id, &edit_endpoint, &connection)?;
    let options = TransactionFormOptions::load(user_id, transaction.account_id, &connection)?;

    let form = transaction_form_view(
        TransactionFormTarget::Update(&update_endpoint),
        &TransactionForm::from(&transaction),
        &options,
        "",
    );
    let content = html! {
        (context.nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Edit Transaction" }
            (form)
        }
    };

    Ok((
        jar,
        base("Edit Transaction", &[currency_input_styles()], &content),
    )
        .into_response())
}

/// Handle transaction update form submission, redirecting to the transactions page on success.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<Uuid>,
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::TRANSACTION, transaction_id);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let data = match form.data().validate() {
        Ok(data) => data,
        Err(error) => {
            let account_id = match get_transaction(user_id, transaction_id, &connection) {
                Ok(transaction) => transaction.account_id,
                Err(Error::NotFound) => {
                    return Error::UpdateMissingTransaction.into_alert_response();
                }
                Err(error) => return error.into_alert_response(),
            };

            return form_error_response(
                TransactionFormTarget::Update(&update_endpoint),
                &form,
                &error,
                user_id,
                account_id,
                &connection,
            );
        }
    };

    match update_transaction(user_id, transaction_id, &data, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::UpdateMissingTransaction | Error::InvalidCategory)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating transaction {transaction_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
