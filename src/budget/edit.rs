//! Budget item editing page and endpoint.

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
    budget::{
        BudgetState,
        form::{
            BudgetItemForm, BudgetItemFormOptions, BudgetItemFormTarget, budget_item_form_view,
            form_error_response,
        },
        get_budget_item, update_budget_item,
    },
    category::get_categories,
    endpoints,
    goal::get_goals,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::load_page_context,
};

/// Render the page for editing budget item `budget_item_id`.
pub async fn get_edit_budget_item_page(
    Path(budget_item_id): Path<Uuid>,
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget_item = get_budget_item(user_id, budget_item_id, &connection)?;
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_BUDGET_ITEM_VIEW, budget_item_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::BUDGET_ITEM, budget_item_id);
    let (jar, context) = load_page_context(jar, user_id, &edit_endpoint, &connection)?;
    let categories = get_categories(&connection)?;
    let goals = get_goals(user_id, budget_item.account_id, &connection)?;

    let form = budget_item_form_view(
        BudgetItemFormTarget::Update(&update_endpoint),
        &BudgetItemForm::from(&budget_item),
        &BudgetItemFormOptions {
            categories: &categories,
            goals: &goals,
        },
        "",
    );
    let content = html! {
        (context.nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Edit Budget Item" }
            (form)
        }
    };

    Ok((
        jar,
        base("Edit Budget Item", &[currency_input_styles()], &content),
    )
        .into_response())
}

/// Handle budget item update form submission, redirecting to the budget page on success.
pub async fn update_budget_item_endpoint(
    Path(budget_item_id): Path<Uuid>,
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<BudgetItemForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::BUDGET_ITEM, budget_item_id);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let data = match form.item_data().validate() {
        Ok(data) => data,
        Err(error) => {
            let account_id = match get_budget_item(user_id, budget_item_id, &connection) {
                Ok(budget_item) => budget_item.account_id,
                Err(Error::NotFound) => return Error::UpdateMissingBudgetItem.into_alert_response(),
                Err(error) => return error.into_alert_response(),
            };

            return form_error_response(
                BudgetItemFormTarget::Update(&update_endpoint),
                &form,
                &error,
                user_id,
                account_id,
                &connection,
            );
        }
    };

    match update_budget_item(user_id, budget_item_id, &data, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::BUDGET_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::UpdateMissingBudgetItem | Error::InvalidCategory | Error::InvalidGoal),
        ) => error.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating budget item {budget_item_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
