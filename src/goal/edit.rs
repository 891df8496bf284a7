//! Goal editing page and endpoint.

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
    goal::{
        GoalState,
        form::{GoalForm, GoalFormTarget, goal_form_view},
        get_goal, update_goal,
    },
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::load_page_context,
};

/// Render the page for editing goal `goal_id`.
pub async fn get_edit_goal_page(
    Path(goal_id): Path<Uuid>,
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = get_goal(user_id, goal_id, &connection)?;
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_GOAL_VIEW, goal_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::GOAL, goal_id);
    let (jar, context) = load_page_context(jar, user_id, &edit_endpoint, &connection)?;

    let form = goal_form_view(
        GoalFormTarget::Update(&update_endpoint),
        &GoalForm::from(&goal),
        "",
    );
    let content = html! {
        (context.nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Edit Goal" }
            (form)
        }
    };

    Ok((jar, base("Edit Goal", &[currency_input_styles()], &content)).into_response())
}

/// Handle goal update form submission, redirecting to the goals page on success.
pub async fn update_goal_endpoint(
    Path(goal_id): Path<Uuid>,
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<GoalForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::GOAL, goal_id);

    let data = match form.clone().into_data().validate() {
        Ok(data) => data,
        Err(error) => {
            return goal_form_view(
                GoalFormTarget::Update(&update_endpoint),
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

    match update_goal(user_id, goal_id, &data, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingGoal) => Error::UpdateMissingGoal.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}
