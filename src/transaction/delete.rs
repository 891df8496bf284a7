//! Transaction deletion endpoint.

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
    transaction::{TransactionState, core::delete_transaction},
};

/// Delete a transaction.
///
/// The status code has to be 200 OK or HTMX will not remove the table row.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<Uuid>,
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(user_id, transaction_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingTransaction) => {
            Error::DeleteMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;
    use uuid::Uuid;

    use crate::{
        Error,
        test_utils::{create_test_user_with_email, get_test_db_with_account},
        transaction::{
            TransactionData, TransactionKind, TransactionLinks, TransactionState,
            create_transaction, core::get_transaction,
        },
    };

    use super::delete_transaction_endpoint;

    fn lunch() -> TransactionData {
        TransactionData {
            amount: 14.0,
            kind: TransactionKind::Expense,
            date: date!(2025 - 02 - 20),
            category_id: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn can_delete_transaction() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let created = create_transaction(
            user_id,
            account.id,
            &lunch(),
            &TransactionLinks::default(),
            &db_connection.lock().unwrap(),
        )
        .unwrap();
        let id = created.transaction.id;
        let state = TransactionState::new(db_connection);

        let response =
            delete_transaction_endpoint(Path(id), State(state.clone()), Extension(user_id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_transaction(user_id, id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn cannot_delete_another_users_transaction() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let (id, other_user) = {
            let connection = db_connection.lock().unwrap();
            let created = create_transaction(
                user_id,
                account.id,
                &lunch(),
                &TransactionLinks::default(),
                &connection,
            )
            .unwrap();
            let other_user = create_test_user_with_email("other@example.com", &connection);
            (created.transaction.id, other_user)
        };
        let state = TransactionState::new(db_connection);

        let response =
            delete_transaction_endpoint(Path(id), State(state.clone()), Extension(other_user))
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(get_transaction(user_id, id, &state.db_connection.lock().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn deleting_missing_transaction_returns_not_found() {
        let (db_connection, user_id, _) = get_test_db_with_account();

        let response = delete_transaction_endpoint(
            Path(Uuid::new_v4()),
            State(TransactionState::new(db_connection)),
            Extension(user_id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
