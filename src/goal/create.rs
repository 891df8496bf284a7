//! Goal creation page and endpoint.

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
    goal::{
        GoalState, create_goal,
        form::{GoalForm, GoalFormTarget, goal_form_view},
    },
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::load_page_context,
};

/// Render the page for creating a goal in the active account.
pub async fn get_new_goal_page(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) = load_page_context(jar, user_id, endpoints::NEW_GOAL_VIEW, &connection)?;
    let form = goal_form_view(
        GoalFormTarget::Create(endpoints::GOALS_API),
        &GoalForm::default(),
        "",
    );

    let content = html! {
        (context.nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "New Goal" }
            p class="mb-4 text-sm text-gray-500" { "In " (context.account.name) }
            (form)
        }
    };

    Ok((jar, base("New Goal", &[currency_input_styles()], &content)).into_response())
}

/// Handle goal creation form submission, redirecting to the goals page on success.
pub async fn create_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
    Form(form): Form<GoalForm>,
) -> Response {
    let data = match form.clone().into_data().validate() {
        Ok(data) => data,
        Err(error) => {
            return goal_form_view(
                GoalFormTarget::Create(endpoints::GOALS_API),
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

    let result = active_account(jar, user_id, &connection).and_then(|(jar, account)| {
        create_goal(user_id, account.id, &data, &connection)?;
        Ok(jar)
    });

    match result {
        Ok(jar) => (
            jar,
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a goal: {error}");
            error.into_alert_response()
        }
    }
}
