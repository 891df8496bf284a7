//! Switching a budget item between active and inactive.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use uuid::Uuid;

use crate::{
    Error,
    auth::UserID,
    budget::{BudgetState, toggle_budget_item},
    endpoints,
};

/// Flip the active flag of a budget item and reload the budget page so the
/// totals are recomputed.
pub async fn toggle_budget_item_endpoint(
    Path(budget_item_id): Path<Uuid>,
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match toggle_budget_item(user_id, budget_item_id, &connection) {
        Ok(active) => {
            tracing::debug!("budget item {budget_item_id} is now active: {active}");
            (
                HxRedirect(endpoints::BUDGET_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::UpdateMissingBudgetItem) => Error::UpdateMissingBudgetItem.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while toggling budget item {budget_item_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
