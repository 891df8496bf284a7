//! Account deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    Error,
    account::{create::AccountState, delete_account},
    alert::Alert,
    auth::UserID,
};

/// Delete an account and everything recorded in it.
///
/// Responds with an error alert if this is the user's only account.
pub async fn delete_account_endpoint(
    Path(account_id): Path<Uuid>,
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_account(user_id, account_id, &connection) {
        Ok(()) => {
            tracing::info!("user {user_id} deleted account {account_id}");
            Alert::SuccessSimple {
                message: "Account deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(error @ (Error::LastAccount | Error::DeleteMissingAccount)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting account {account_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
