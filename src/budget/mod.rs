//! Recurring budget items and the monthly and annual budget they add up to.

mod core;
mod create;
mod delete;
mod edit;
mod figures;
mod form;
mod page;
mod toggle;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use core::{
    BudgetItem, BudgetItemData, Frequency, create_budget_item, create_budget_item_table,
    create_budget_item_with_goal, delete_budget_item, ensure_budget_item_in_account,
    get_budget_item, get_budget_items, toggle_budget_item, update_budget_item,
};
pub use create::{create_budget_item_endpoint, get_new_budget_item_page};
pub use delete::delete_budget_item_endpoint;
pub use edit::{get_edit_budget_item_page, update_budget_item_endpoint};
pub use page::get_budget_page;
pub use toggle::toggle_budget_item_endpoint;

/// The state needed for the budget pages and endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
