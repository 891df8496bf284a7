//! Budget item deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    Error,
    alert::Alert,
    auth::UserID,
    budget::{BudgetState, delete_budget_item},
};

/// Delete a budget item. Transactions assigned to it are kept but unassigned.
pub async fn delete_budget_item_endpoint(
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

    match delete_budget_item(user_id, budget_item_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Budget item deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingBudgetItem) => Error::DeleteMissingBudgetItem.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting budget item {budget_item_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
