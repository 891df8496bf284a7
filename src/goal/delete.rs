//! Goal deletion endpoint.

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
    goal::{GoalState, delete_goal},
};

/// Delete a goal. Budget items that saved towards it are kept but unlinked.
pub async fn delete_goal_endpoint(
    Path(goal_id): Path<Uuid>,
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_goal(user_id, goal_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Goal deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingGoal) => Error::DeleteMissingGoal.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_goal_endpoint_tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::params;
    use uuid::Uuid;

    use crate::{
        Error,
        goal::{GoalData, GoalPeriod, GoalState, create_goal, get_goal},
        test_utils::get_test_db_with_account,
    };

    use super::delete_goal_endpoint;

    #[tokio::test]
    async fn deleting_goal_unlinks_budget_items() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let budget_item_id = Uuid::new_v4();
        let goal = {
            let connection = db_connection.lock().unwrap();
            let goal = create_goal(
                user_id,
                account.id,
                &GoalData {
                    name: "Holiday".to_owned(),
                    target_amount: 1000.0,
                    current_amount: 0.0,
                    period: GoalPeriod::OneOff,
                    deadline: None,
                },
                &connection,
            )
            .unwrap();
            connection
                .execute(
                    "INSERT INTO budget_item (id, user_id, account_id, name, amount, frequency, \
                        goal_id, active, sort_order)
                    VALUES (?1, ?2, ?3, 'Holiday fund', 100, 'monthly', ?4, 1, 0)",
                    params![budget_item_id, user_id.as_i64(), account.id, goal.id],
                )
                .unwrap();
            goal
        };
        let state = GoalState::new(db_connection);

        let response =
            delete_goal_endpoint(Path(goal.id), State(state.clone()), Extension(user_id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_goal(user_id, goal.id, &connection), Err(Error::NotFound));
        let linked_goal: Option<Uuid> = connection
            .query_row(
                "SELECT goal_id FROM budget_item WHERE id = ?1",
                [budget_item_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(linked_goal, None);
    }

    #[tokio::test]
    async fn deleting_missing_goal_returns_not_found() {
        let (db_connection, user_id, _) = get_test_db_with_account();

        let response = delete_goal_endpoint(
            Path(Uuid::new_v4()),
            State(GoalState::new(db_connection)),
            Extension(user_id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
