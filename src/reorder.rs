//! Drag and drop reordering for accounts, categories, budget items and goals.
//!
//! `/static/app.js` posts the IDs of a list's items in their new order as
//! repeated `id` form fields. Each item's `sort_order` becomes its position.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::{Connection, params};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, Error, auth::UserID};

/// The tables whose rows can be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderTable {
    Account,
    Category,
    BudgetItem,
    Goal,
}

impl ReorderTable {
    fn update_query(self) -> &'static str {
        match self {
            ReorderTable::Account => {
                "UPDATE account SET sort_order = ?1 WHERE id = ?2 AND user_id = ?3"
            }
            ReorderTable::BudgetItem => {
                "UPDATE budget_item SET sort_order = ?1 WHERE id = ?2 AND user_id = ?3"
            }
            ReorderTable::Goal => "UPDATE goal SET sort_order = ?1 WHERE id = ?2 AND user_id = ?3",
            // Categories are shared by all users.
            ReorderTable::Category => "UPDATE category SET sort_order = ?1 WHERE id = ?2",
        }
    }
}

/// Set the `sort_order` of each row in `ids` to its index in `ids`.
///
/// IDs that do not exist, or belong to another user, are skipped.
/// The whole list is written in a single transaction.
pub fn reorder(
    table: ReorderTable,
    user_id: UserID,
    ids: &[Uuid],
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    {
        let mut statement = transaction.prepare(table.update_query())?;

        for (position, id) in ids.iter().enumerate() {
            let position = position as i64;
            match table {
                ReorderTable::Category => statement.execute(params![position, id])?,
                _ => statement.execute(params![position, id, user_id.as_i64()])?,
            };
        }
    }

    transaction.commit()?;

    Ok(())
}

/// The state needed for the reorder endpoints.
#[derive(Debug, Clone)]
pub struct ReorderState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReorderState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The new order of a list, e.g. `id=...&id=...`.
#[derive(Debug, Default, Deserialize)]
pub struct ReorderForm {
    #[serde(default)]
    pub id: Vec<Uuid>,
}

fn reorder_response(
    table: ReorderTable,
    state: ReorderState,
    user_id: UserID,
    form: ReorderForm,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match reorder(table, user_id, &form.id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("could not reorder {table:?} rows: {error}");
            error.into_alert_response()
        }
    }
}

pub async fn reorder_accounts_endpoint(
    State(state): State<ReorderState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ReorderForm>,
) -> Response {
    reorder_response(ReorderTable::Account, state, user_id, form)
}

pub async fn reorder_categories_endpoint(
    State(state): State<ReorderState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ReorderForm>,
) -> Response {
    reorder_response(ReorderTable::Category, state, user_id, form)
}

pub async fn reorder_budget_items_endpoint(
    State(state): State<ReorderState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ReorderForm>,
) -> Response {
    reorder_response(ReorderTable::BudgetItem, state, user_id, form)
}

pub async fn reorder_goals_endpoint(
    State(state): State<ReorderState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ReorderForm>,
) -> Response {
    reorder_response(ReorderTable::Goal, state, user_id, form)
}
