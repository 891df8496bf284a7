//! Budget item creation page and endpoint.

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
    budget::{
        BudgetState, create_budget_item, create_budget_item_with_goal,
        form::{
            BudgetItemForm, BudgetItemFormOptions, BudgetItemFormTarget, budget_item_form_view,
            form_error_response,
        },
    },
    category::get_categories,
    endpoints,
    goal::get_goals,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::load_page_context,
};

/// Render the page for creating a budget item in the active account.
pub async fn get_new_budget_item_page(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) =
        load_page_context(jar, user_id, endpoints::NEW_BUDGET_ITEM_VIEW, &connection)?;
    let categories = get_categories(&connection)?;
    let goals = get_goals(user_id, context.account.id, &connection)?;

    let form = budget_item_form_view(
        BudgetItemFormTarget::Create(endpoints::BUDGET_ITEMS_API),
        &BudgetItemForm::default(),
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
            h1 class="mb-4 text-xl font-bold" { "New Budget Item" }
            p class="mb-4 text-sm text-gray-500" { "In " (context.account.name) }
            (form)
        }
    };

    Ok((
        jar,
        base("New Budget Item", &[currency_input_styles()], &content),
    )
        .into_response())
}

/// Handle budget item creation, redirecting to the budget page on success.
///
/// When the form asks for it, a new goal is created in the same account and
/// linked to the item.
pub async fn create_budget_item_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
    Form(form): Form<BudgetItemForm>,
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

    let validated = form
        .item_data()
        .validate()
        .and_then(|data| Ok((data, form.inline_goal()?)));
    let (data, inline_goal) = match validated {
        Ok(validated) => validated,
        Err(error) => {
            let response = form_error_response(
                BudgetItemFormTarget::Create(endpoints::BUDGET_ITEMS_API),
                &form,
                &error,
                user_id,
                account.id,
                &connection,
            );
            return (jar, response).into_response();
        }
    };

    let result = match &inline_goal {
        Some(goal) => create_budget_item_with_goal(user_id, account.id, &data, goal, &connection),
        None => create_budget_item(user_id, account.id, &data, &connection),
    };

    match result {
        Ok(budget_item) => {
            tracing::info!("user {user_id} created budget item {}", budget_item.id);
            (
                jar,
                HxRedirect(endpoints::BUDGET_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ (Error::InvalidCategory | Error::InvalidGoal)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a budget item: {error}");
            error.into_alert_response()
        }
    }
}
